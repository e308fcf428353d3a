//! Shared test fixtures for integration tests.

use gridop::config::ScenarioConfig;
use gridop::market::SyntheticMarketData;
use gridop::runner::Runner;
use gridop::sim::state::SimulationState;

/// Default scenario (baseline preset, seed 42).
pub fn default_scenario() -> ScenarioConfig {
    ScenarioConfig::baseline()
}

/// Initial state for the baseline scenario.
#[allow(dead_code)]
pub fn default_state() -> SimulationState {
    default_scenario().build_state()
}

/// Runner over the baseline scenario with the scenario's seed.
pub fn default_runner() -> Runner<SyntheticMarketData> {
    let scenario = default_scenario();
    let source = SyntheticMarketData::new(scenario.simulation.seed);
    Runner::new(scenario.build_state(), source)
}
