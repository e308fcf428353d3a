//! Per-tick generator dispatch.

use crate::assets::{Generator, GeneratorType};
use crate::market::MarketSample;

/// Dispatchable output may ramp at most ±50% of capacity per tick.
pub const MAX_CORRECTION_FRACTION: f64 = 0.5;

/// Recomputes every generator's output for one tick and returns the total
/// supply in MW.
///
/// Solar and wind multiply capacity by their exogenous availability
/// factors; every other type multiplies capacity by the frequency
/// correction (a percentage, clamped to ±50%). Outputs are clamped to
/// `[0, capacity]` as the final step, so the output bound holds even when
/// the correction pushes above nameplate.
///
/// Without a market sample the tick degrades rather than failing:
/// renewables produce nothing and dispatchable units run at full capacity
/// with no correction applied.
pub fn dispatch_generators(
    generators: &mut [Generator],
    sample: Option<&MarketSample>,
    pid_correction_pct: f64,
) -> f64 {
    let mut total_supply_mw = 0.0;

    for generator in generators.iter_mut() {
        let raw_output_mw = match sample {
            Some(market) => match generator.kind {
                GeneratorType::Solar => generator.capacity_mw * market.solar_factor,
                GeneratorType::Wind => generator.capacity_mw * market.wind_factor,
                _ => {
                    let correction = (pid_correction_pct / 100.0)
                        .clamp(-MAX_CORRECTION_FRACTION, MAX_CORRECTION_FRACTION);
                    generator.capacity_mw * (1.0 + correction)
                }
            },
            None => {
                if generator.kind.is_dispatchable() {
                    generator.capacity_mw
                } else {
                    0.0
                }
            }
        };

        generator.current_output_mw = raw_output_mw.clamp(0.0, generator.capacity_mw);
        total_supply_mw += generator.current_output_mw;
    }

    total_supply_mw
}
