//! Core simulation state and the per-tick record.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assets::{Battery, Generator};
use crate::market::MarketState;

use super::clock::SimClock;
use super::pid::PidController;
use super::sustainability::SustainabilityState;

/// Customer base the market load data is normalized to. Effective load
/// scales linearly with the operator's customer count against this base.
pub const BASE_CUSTOMERS: f64 = 100_000.0;

/// One frequency observation, kept for history and collapse detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPoint {
    /// Tick at which the frequency was observed.
    pub tick: u64,
    /// Observed frequency in Hz.
    pub frequency_hz: f64,
}

/// Electrical state of the single-bus network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkState {
    /// Grid frequency in Hz, nominal 50.0. Unclamped so collapse can be
    /// detected externally.
    pub frequency_hz: f64,
    /// Load served this tick in MW.
    pub load_mw: f64,
    /// Supply after battery contribution this tick in MW.
    pub supply_mw: f64,
    /// Connected customers.
    pub customers: u64,
    /// Whether the orchestrator may schedule new ticks.
    pub is_running: bool,
    /// Ticks per wall-clock second for the hosting UI.
    pub tick_speed: u32,
    /// Frequency observations, one per tick.
    pub frequency_history: Vec<FrequencyPoint>,
    /// Closed-loop frequency controller state.
    pub pid: PidController,
}

/// Aggregate state of one simulation run.
///
/// Mutated atomically once per tick by the engine; everything is plain
/// serializable data so a run can be suspended and resumed bit-for-bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Owned generation units.
    pub generators: Vec<Generator>,
    /// Owned battery storage.
    pub battery: Battery,
    /// Electrical network state.
    pub network: NetworkState,
    /// Market price state.
    pub market: MarketState,
    /// Emissions and renewable-share accounting.
    pub sustainability: SustainabilityState,
    /// Player funds in dollars. The engine never clamps this; insolvency
    /// policy belongs to the game-rules layer.
    pub balance: f64,
    /// Funds at the start of the run, for the money-made summary field.
    pub initial_balance: f64,
    /// Completed ticks.
    pub iteration: u64,
    /// Simulated date and hour.
    pub clock: SimClock,
    /// Sum of per-tick absolute frequency deviations, for the run summary.
    pub deviation_sum_hz: f64,
    /// Largest customer count seen during the run.
    pub peak_customers: u64,
    /// Next generator id to assign on purchase.
    pub next_generator_id: u32,
}

/// Complete record of one simulation tick, exposed for rendering and
/// telemetry export.
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    /// Tick index after this step.
    pub tick: u64,
    /// Simulated date after this step.
    pub date: NaiveDate,
    /// Simulated hour after this step.
    pub hour: u8,
    /// Grid frequency in Hz.
    pub frequency_hz: f64,
    /// Load served in MW.
    pub load_mw: f64,
    /// Supply after battery contribution in MW.
    pub supply_mw: f64,
    /// Battery power in MW (negative = discharging).
    pub battery_power_mw: f64,
    /// Battery stored energy in MWh.
    pub battery_charge_mwh: f64,
    /// Clearing price in $/MWh.
    pub price_per_mwh: f64,
    /// Whether the price was recomputed on this tick.
    pub price_updated: bool,
    /// Net income this tick in dollars.
    pub net_income: f64,
    /// Balance after this tick in dollars.
    pub balance: f64,
    /// Emissions this tick in kg CO₂.
    pub emissions_kg: f64,
    /// Renewable share of this tick's generation in percent.
    pub renewable_pct: f64,
    /// PID dispatch correction applied this tick, in percent.
    pub pid_correction_pct: f64,
    /// Whether a market sample was available for this tick.
    pub had_market_data: bool,
}

impl fmt::Display for TickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} {} {:02}:00 | f={:>7.4} Hz | load={:>7.1} MW  supply={:>7.1} MW  \
             bat={:>6.2} MW (chg={:>5.1} MWh) | ${:>6.2}/MWh  income=${:>9.2}  \
             balance=${:>11.2} | co2={:>9.1} kg  ren={:>5.1}%{}",
            self.tick,
            self.date,
            self.hour,
            self.frequency_hz,
            self.load_mw,
            self.supply_mw,
            self.battery_power_mw,
            self.battery_charge_mwh,
            self.price_per_mwh,
            self.net_income,
            self.balance,
            self.emissions_kg,
            self.renewable_pct,
            if self.had_market_data { "" } else { " [no data]" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::SIM_EPOCH;

    #[test]
    fn tick_result_display_does_not_panic() {
        let r = TickResult {
            tick: 1,
            date: SIM_EPOCH,
            hour: 1,
            frequency_hz: 49.987,
            load_mw: 812.4,
            supply_mw: 810.0,
            battery_power_mw: -2.4,
            battery_charge_mwh: 7.5,
            price_per_mwh: 50.0,
            price_updated: false,
            net_income: 23_456.78,
            balance: 33_456.78,
            emissions_kg: 410_000.0,
            renewable_pct: 12.5,
            pid_correction_pct: 0.13,
            had_market_data: true,
        };
        let s = format!("{r}");
        assert!(s.contains("49.9870"));
        assert!(!s.contains("[no data]"));
    }

    #[test]
    fn missing_data_is_flagged_in_display() {
        let r = TickResult {
            tick: 2,
            date: SIM_EPOCH,
            hour: 2,
            frequency_hz: 50.0,
            load_mw: 0.0,
            supply_mw: 500.0,
            battery_power_mw: 0.0,
            battery_charge_mwh: 10.0,
            price_per_mwh: 50.0,
            price_updated: false,
            net_income: -100.0,
            balance: 9_900.0,
            emissions_kg: 0.0,
            renewable_pct: 0.0,
            pid_correction_pct: 0.0,
            had_market_data: false,
        };
        assert!(format!("{r}").contains("[no data]"));
    }
}
