//! The tick engine: one simulated hour per step.

use std::error::Error;
use std::fmt;

use crate::assets::{Generator, GeneratorType};
use crate::market::MarketSample;

use super::NOMINAL_FREQUENCY_HZ;
use super::dispatch::dispatch_generators;
use super::financials::net_income;
use super::frequency::next_frequency_hz;
use super::inertia::system_inertia_s;
use super::state::{BASE_CUSTOMERS, FrequencyPoint, SimulationState, TickResult};

/// Rejected generator purchase.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseError {
    /// Balance does not cover the acquisition cost.
    InsufficientFunds {
        /// Acquisition cost of the requested unit.
        required: f64,
        /// Current balance.
        available: f64,
    },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "insufficient funds: need ${required:.2}, have ${available:.2}"
            ),
        }
    }
}

impl Error for PurchaseError {}

/// Simulation engine owning one run's state.
///
/// `tick` is a total state-transition function: it always completes and
/// produces a valid next state, degrading by policy on degenerate input
/// (no generators, missing market sample, empty battery) instead of
/// failing. Scheduling and market-data I/O live in the runner so the
/// transition itself stays deterministic and unit-testable.
#[derive(Debug, Clone)]
pub struct Engine {
    state: SimulationState,
}

impl Engine {
    /// Creates an engine over an initial state.
    pub fn new(state: SimulationState) -> Self {
        Self { state }
    }

    /// Returns the state snapshot after the most recent tick.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Consumes the engine and returns the final state.
    pub fn into_state(self) -> SimulationState {
        self.state
    }

    /// Executes one simulation tick against one hour of market data.
    ///
    /// Runs the full per-hour pipeline in dependency order: clock advance,
    /// PID correction, generator dispatch, battery dispatch, frequency
    /// update, pricing, financials, sustainability. `None` for the sample
    /// degrades per policy: zero load, zero renewable output, dispatchables
    /// at full capacity.
    pub fn tick(&mut self, sample: Option<&MarketSample>) -> TickResult {
        let state = &mut self.state;

        // 1. Advance simulated time
        state.clock.advance();

        // 2. Frequency controller
        let correction_pct = state.network.pid.update(state.network.frequency_hz);

        // 3. Generator dispatch
        let supply_mw = dispatch_generators(&mut state.generators, sample, correction_pct);

        // 4. Load scaled to the customer base
        let load_mw = sample
            .map(|m| m.load_mw * state.network.customers as f64 / BASE_CUSTOMERS)
            .unwrap_or(0.0);

        // 5. Battery dispatch against the imbalance
        let battery_power_mw = state.battery.dispatch_mw(supply_mw, load_mw);
        state.battery.apply_dispatch(battery_power_mw);
        // negative battery power (discharge) adds supply
        let final_supply_mw = supply_mw - battery_power_mw;

        // 6. Frequency dynamics
        let inertia_s = system_inertia_s(&state.generators);
        let frequency_hz = next_frequency_hz(
            state.network.frequency_hz,
            final_supply_mw,
            load_mw,
            inertia_s,
        );

        state.network.frequency_hz = frequency_hz;
        state.network.load_mw = load_mw;
        state.network.supply_mw = final_supply_mw;
        state.iteration += 1;
        state.network.frequency_history.push(FrequencyPoint {
            tick: state.iteration,
            frequency_hz,
        });

        // 7. Pricing from the deviation window
        let deviation_hz = (frequency_hz - NOMINAL_FREQUENCY_HZ).abs();
        state.deviation_sum_hz += deviation_hz;
        let price_updated = state.market.record_deviation(deviation_hz, state.iteration);

        // 8. Financials
        let income = net_income(
            &state.generators,
            final_supply_mw,
            load_mw,
            battery_power_mw,
            state.market.price_per_mwh,
        );
        state.balance += income;

        // 9. Sustainability accounting
        state.sustainability.record_tick(&state.generators);

        TickResult {
            tick: state.iteration,
            date: state.clock.date,
            hour: state.clock.hour,
            frequency_hz,
            load_mw,
            supply_mw: final_supply_mw,
            battery_power_mw,
            battery_charge_mwh: state.battery.charge_mwh,
            price_per_mwh: state.market.price_per_mwh,
            price_updated,
            net_income: income,
            balance: state.balance,
            emissions_kg: state.sustainability.current_emissions_kg,
            renewable_pct: state.sustainability.current_renewable_percentage(),
            pid_correction_pct: correction_pct,
            had_market_data: sample.is_some(),
        }
    }

    /// Purchases one generator of the given type, charging its acquisition
    /// cost. Returns the new unit's id.
    pub fn purchase_generator(&mut self, kind: GeneratorType) -> Result<u32, PurchaseError> {
        let cost = kind.acquisition_cost();
        if self.state.balance < cost {
            return Err(PurchaseError::InsufficientFunds {
                required: cost,
                available: self.state.balance,
            });
        }

        let id = self.state.next_generator_id;
        self.state.next_generator_id += 1;
        self.state.balance -= cost;
        self.state.generators.push(Generator::new(id, kind));
        Ok(id)
    }

    /// Decommissions a generator by id. Returns `false` when no unit with
    /// that id exists.
    pub fn decommission_generator(&mut self, id: u32) -> bool {
        let before = self.state.generators.len();
        self.state.generators.retain(|g| g.id != id);
        self.state.generators.len() != before
    }

    /// Grows the customer base, tracking the run's peak.
    pub fn add_customers(&mut self, count: u64) {
        self.state.network.customers += count;
        self.state.peak_customers = self.state.peak_customers.max(self.state.network.customers);
    }

    /// Replaces the PID gains, resetting controller state.
    pub fn set_pid_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.state.network.pid.set_gains(kp, ki, kd);
    }

    /// Sets the ticks-per-second multiplier for the hosting scheduler.
    pub fn set_tick_speed(&mut self, speed: u32) {
        self.state.network.tick_speed = speed.max(1);
    }

    /// Expands battery capacity and rate limits.
    pub fn upgrade_battery(&mut self, added_capacity_mwh: f64, added_rate_mw: f64) {
        self.state.battery.upgrade(added_capacity_mwh, added_rate_mw);
    }

    /// Stops scheduling new ticks. In-flight state is kept so the run can
    /// resume exactly where it left off.
    pub fn pause(&mut self) {
        self.state.network.is_running = false;
    }

    /// Resumes tick scheduling.
    pub fn resume(&mut self) {
        self.state.network.is_running = true;
    }
}
