//! Per-tick financial accounting.

use crate::assets::Generator;

/// Flat battery usage fee in $/MWh of throughput.
pub const BATTERY_USAGE_FEE_PER_MWH: f64 = 1.0;

/// Computes the net income for one simulated hour.
///
/// Revenue is paid only for power actually consumed
/// (`min(final_supply, load)`); curtailed surplus earns nothing. Variable
/// cost is charged on full generator output regardless of curtailment (fuel
/// is burned even when the power is wasted), fixed hourly costs accrue per
/// owned unit, and battery throughput pays a flat usage fee.
pub fn net_income(
    generators: &[Generator],
    final_supply_mw: f64,
    load_mw: f64,
    battery_power_mw: f64,
    price_per_mwh: f64,
) -> f64 {
    let delivered_mw = final_supply_mw.min(load_mw);
    let revenue = delivered_mw * price_per_mwh;

    let variable_cost: f64 = generators
        .iter()
        .map(|g| g.current_output_mw * g.kind.variable_cost_per_mwh())
        .sum();

    let fixed_cost: f64 = generators.iter().map(|g| g.kind.hourly_fixed_cost()).sum();

    let battery_cost = battery_power_mw.abs() * BATTERY_USAGE_FEE_PER_MWH;

    revenue - variable_cost - fixed_cost - battery_cost
}
