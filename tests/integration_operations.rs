//! Integration tests for operator actions during a run.

mod common;

use chrono::NaiveDate;
use gridop::assets::GeneratorType;
use gridop::config::ScenarioConfig;
use gridop::market::{MarketDataError, MarketDataSource, MarketSample};
use gridop::runner::Runner;
use gridop::sim::engine::{Engine, PurchaseError};

/// Source producing a flat load with fixed availability factors.
struct ConstantSource {
    load_mw: f64,
    solar: f64,
    wind: f64,
}

impl MarketDataSource for ConstantSource {
    fn market_window(
        &mut self,
        start: NaiveDate,
        start_hour: u8,
        length_hours: usize,
    ) -> Result<Vec<MarketSample>, MarketDataError> {
        let mut samples = Vec::with_capacity(length_hours);
        let mut date = start;
        let mut hour = start_hour;
        for _ in 0..length_hours {
            samples.push(MarketSample {
                date,
                hour,
                load_mw: self.load_mw,
                solar_factor: self.solar,
                wind_factor: self.wind,
            });
            hour += 1;
            if hour >= 24 {
                hour = 0;
                date = date.succ_opt().unwrap_or(date);
            }
        }
        Ok(samples)
    }
}

/// Delivers one short window, then fails every later fetch.
struct FlakySource {
    delivered: bool,
    window_hours: usize,
}

impl MarketDataSource for FlakySource {
    fn market_window(
        &mut self,
        start: NaiveDate,
        start_hour: u8,
        _length_hours: usize,
    ) -> Result<Vec<MarketSample>, MarketDataError> {
        if self.delivered {
            return Err(MarketDataError::new("upstream unavailable"));
        }
        self.delivered = true;
        ConstantSource {
            load_mw: 500.0,
            solar: 0.0,
            wind: 0.0,
        }
        .market_window(start, start_hour, self.window_hours)
    }
}

fn coal_scenario() -> ScenarioConfig {
    let mut scenario = ScenarioConfig::baseline();
    scenario.portfolio.generators = vec!["coal".to_string()];
    scenario
}

#[test]
fn purchase_mid_run_adds_supply_on_the_next_tick() {
    let source = ConstantSource {
        load_mw: 500.0,
        solar: 0.0,
        wind: 0.0,
    };
    let mut runner = Runner::new(coal_scenario().build_state(), source);
    runner.run(5);

    let id = runner
        .engine_mut()
        .purchase_generator(GeneratorType::Hydro)
        .expect("affordable after five profitable ticks");
    assert_eq!(id, 2);

    let result = runner.step().expect("running");
    // coal 500 plus hydro 300, minus up to 5 MW of battery charging
    assert!(result.supply_mw >= 795.0);
    let hydro = runner
        .engine()
        .state()
        .generators
        .iter()
        .find(|g| g.id == id)
        .expect("purchased unit exists");
    assert!(hydro.current_output_mw > 0.0);
}

#[test]
fn decommission_mid_run_removes_supply() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.portfolio.generators = vec!["coal".to_string(), "hydro".to_string()];
    let source = ConstantSource {
        load_mw: 800.0,
        solar: 0.0,
        wind: 0.0,
    };
    let mut runner = Runner::new(scenario.build_state(), source);
    runner.run(3);

    assert!(runner.engine_mut().decommission_generator(1));
    let result = runner.step().expect("running");
    // hydro plus the battery cannot cover what coal served
    assert!(result.supply_mw <= 305.0);
    assert!(result.frequency_hz < 50.0);
}

#[test]
fn insufficient_funds_rejects_the_purchase() {
    let mut scenario = coal_scenario();
    scenario.simulation.initial_balance = 100.0;
    let mut engine = Engine::new(scenario.build_state());
    let err = engine.purchase_generator(GeneratorType::Nuclear);
    assert!(matches!(
        err,
        Err(PurchaseError::InsufficientFunds { .. })
    ));
}

#[test]
fn battery_upgrade_takes_effect_immediately() {
    let mut runner = Runner::new(
        coal_scenario().build_state(),
        ConstantSource {
            load_mw: 500.0,
            solar: 0.0,
            wind: 0.0,
        },
    );
    let before = runner.engine().state().battery.capacity_mwh;
    runner.engine_mut().upgrade_battery(60.0, 10.0);
    let battery = &runner.engine().state().battery;
    assert_eq!(battery.capacity_mwh, before + 60.0);
    assert_eq!(battery.max_rate_mw, 15.0);
}

#[test]
fn gain_change_resets_the_controller() {
    let mut runner = common::default_runner();
    runner.run(10);
    runner.engine_mut().set_pid_gains(1.0, 0.0, 0.0);
    let pid = &runner.engine().state().network.pid;
    assert_eq!(pid.kp, 1.0);
    assert_eq!(pid.integral, 0.0);
    assert_eq!(pid.last_error, None);
}

#[test]
fn pause_stops_stepping_and_resume_continues() {
    let source = ConstantSource {
        load_mw: 500.0,
        solar: 0.0,
        wind: 0.0,
    };
    let mut runner = Runner::new(coal_scenario().build_state(), source);
    runner.run(4);
    runner.engine_mut().pause();
    assert!(runner.step().is_none());
    assert_eq!(runner.engine().state().iteration, 4);

    runner.engine_mut().resume();
    let result = runner.step().expect("running again");
    assert_eq!(result.tick, 5);
}

#[test]
fn all_renewable_fleet_reports_full_renewable_share() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.portfolio.generators = vec!["solar".to_string(), "wind".to_string()];
    let source = ConstantSource {
        load_mw: 180.0,
        solar: 0.6,
        wind: 0.8,
    };
    let mut runner = Runner::new(scenario.build_state(), source);

    let result = runner.step().expect("running");
    // solar 100 × 0.6 + wind 150 × 0.8
    assert!((result.supply_mw - 180.0).abs() < 1e-9);
    assert_eq!(result.renewable_pct, 100.0);
    let expected_emissions = 60.0 * 41.0 + 120.0 * 11.0;
    assert!((result.emissions_kg - expected_emissions).abs() < 1e-9);
    assert_eq!(
        runner.engine().state().sustainability.max_renewable_percentage,
        100.0
    );
}

#[test]
fn exhausted_stale_window_degrades_to_no_data() {
    let source = FlakySource {
        delivered: false,
        window_hours: 5,
    };
    let mut runner = Runner::new(coal_scenario().build_state(), source);

    let results = runner.run(8);
    assert_eq!(results.len(), 8);
    for r in &results[..5] {
        assert!(r.had_market_data);
        assert_eq!(r.load_mw, 500.0);
    }
    for r in &results[5..] {
        assert!(!r.had_market_data);
        assert_eq!(r.load_mw, 0.0);
    }
}

#[test]
fn customer_growth_scales_the_served_load() {
    let source = ConstantSource {
        load_mw: 500.0,
        solar: 0.0,
        wind: 0.0,
    };
    let mut runner = Runner::new(coal_scenario().build_state(), source);
    let first = runner.step().expect("running");
    assert_eq!(first.load_mw, 500.0);

    runner.engine_mut().add_customers(100_000);
    let second = runner.step().expect("running");
    assert_eq!(second.load_mw, 1000.0);
    assert_eq!(runner.engine().state().peak_customers, 200_000);
}
