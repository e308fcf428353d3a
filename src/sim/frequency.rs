//! Swing-equation frequency dynamics.

use super::NOMINAL_FREQUENCY_HZ;

/// Computes next-tick frequency from the supply/demand imbalance.
///
/// Linearized swing equation: `Δf = (supply − load) / (2·H·f0)`. No
/// clamping is applied; frequency may diverge arbitrarily and collapse
/// detection is the consumer's concern. With zero inertia there is no
/// physical basis for an update and the frequency holds.
pub fn next_frequency_hz(
    frequency_hz: f64,
    supply_mw: f64,
    load_mw: f64,
    inertia_s: f64,
) -> f64 {
    if inertia_s == 0.0 {
        return frequency_hz;
    }

    let imbalance_mw = supply_mw - load_mw;
    frequency_hz + imbalance_mw / (2.0 * inertia_s * NOMINAL_FREQUENCY_HZ)
}
