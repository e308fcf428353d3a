//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::assets::{Battery, Generator, GeneratorType};
use crate::market::MarketState;
use crate::sim::clock::SimClock;
use crate::sim::pid::PidController;
use crate::sim::state::{NetworkState, SimulationState};
use crate::sim::sustainability::SustainabilityState;
use crate::sim::NOMINAL_FREQUENCY_HZ;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Frequency controller gains.
    #[serde(default)]
    pub pid: PidConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Starting generation portfolio.
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed for the synthetic market data.
    pub seed: u64,
    /// Ticks per wall-clock second (must be > 0).
    pub tick_speed: u32,
    /// Starting balance in dollars.
    pub initial_balance: f64,
    /// Connected customers at the start of the run (must be > 0).
    pub customers: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_speed: 1,
            initial_balance: 10_000.0,
            customers: 100_000,
        }
    }
}

/// Frequency controller gains.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PidConfig {
    /// Proportional gain (must be >= 0).
    pub kp: f64,
    /// Integral gain (must be >= 0).
    pub ki: f64,
    /// Derivative gain (must be >= 0).
    pub kd: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.5,
            ki: 0.1,
            kd: 0.05,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (MWh, must be > 0).
    pub capacity_mwh: f64,
    /// Initial stored energy (MWh, in [0, capacity]).
    pub charge_mwh: f64,
    /// Maximum charge/discharge rate (MW, must be > 0).
    pub max_rate_mw: f64,
    /// Round-trip efficiency component (0.0–1.0].
    pub efficiency: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_mwh: 40.0,
            charge_mwh: 10.0,
            max_rate_mw: 5.0,
            efficiency: 0.95,
        }
    }
}

/// Starting generation portfolio.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Generator type names, one unit per entry.
    pub generators: Vec<String>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            generators: vec!["coal".to_string(), "solar".to_string(), "wind".to_string()],
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            pid: PidConfig::default(),
            battery: BatteryConfig::default(),
            portfolio: PortfolioConfig::default(),
        }
    }

    /// Returns the renewable-heavy preset: large solar and wind fleet with
    /// extra storage to ride through the night.
    pub fn renewable_heavy() -> Self {
        Self {
            simulation: SimulationConfig {
                initial_balance: 20_000.0,
                ..SimulationConfig::default()
            },
            battery: BatteryConfig {
                capacity_mwh: 120.0,
                charge_mwh: 60.0,
                max_rate_mw: 20.0,
                ..BatteryConfig::default()
            },
            portfolio: PortfolioConfig {
                generators: vec![
                    "solar".to_string(),
                    "solar".to_string(),
                    "solar".to_string(),
                    "wind".to_string(),
                    "wind".to_string(),
                    "hydro".to_string(),
                ],
            },
            pid: PidConfig::default(),
        }
    }

    /// Returns the coal-heavy preset: cheap dispatchable capacity, small
    /// storage.
    pub fn coal_heavy() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            pid: PidConfig::default(),
            battery: BatteryConfig {
                capacity_mwh: 20.0,
                charge_mwh: 5.0,
                max_rate_mw: 2.0,
                ..BatteryConfig::default()
            },
            portfolio: PortfolioConfig {
                generators: vec!["coal".to_string(), "coal".to_string()],
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "renewable_heavy", "coal_heavy"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "renewable_heavy" => Ok(Self::renewable_heavy()),
            "coal_heavy" => Ok(Self::coal_heavy()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.tick_speed == 0 {
            errors.push(ConfigError {
                field: "simulation.tick_speed".into(),
                message: "must be > 0".into(),
            });
        }
        if s.customers == 0 {
            errors.push(ConfigError {
                field: "simulation.customers".into(),
                message: "must be > 0".into(),
            });
        }

        let p = &self.pid;
        for (name, gain) in [("kp", p.kp), ("ki", p.ki), ("kd", p.kd)] {
            if gain < 0.0 || !gain.is_finite() {
                errors.push(ConfigError {
                    field: format!("pid.{name}"),
                    message: "must be finite and >= 0".into(),
                });
            }
        }

        let bat = &self.battery;
        if bat.capacity_mwh <= 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_mwh".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.charge_mwh < 0.0 || bat.charge_mwh > bat.capacity_mwh {
            errors.push(ConfigError {
                field: "battery.charge_mwh".into(),
                message: "must be in [0, battery.capacity_mwh]".into(),
            });
        }
        if bat.max_rate_mw <= 0.0 {
            errors.push(ConfigError {
                field: "battery.max_rate_mw".into(),
                message: "must be > 0".into(),
            });
        }
        if !(bat.efficiency > 0.0 && bat.efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "battery.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        for name in &self.portfolio.generators {
            if GeneratorType::from_name(name).is_none() {
                errors.push(ConfigError {
                    field: "portfolio.generators".into(),
                    message: format!("unknown generator type \"{name}\""),
                });
            }
        }

        errors
    }

    /// Builds the initial simulation state for this scenario.
    ///
    /// Call [`validate`](Self::validate) first; unknown generator type
    /// names are silently skipped here.
    pub fn build_state(&self) -> SimulationState {
        let mut generators = Vec::new();
        let mut next_id = 1;
        for name in &self.portfolio.generators {
            if let Some(kind) = GeneratorType::from_name(name) {
                generators.push(Generator::new(next_id, kind));
                next_id += 1;
            }
        }

        let battery = Battery::new(
            self.battery.capacity_mwh,
            self.battery.charge_mwh,
            self.battery.max_rate_mw,
            self.battery.efficiency,
        );

        SimulationState {
            generators,
            battery,
            network: NetworkState {
                frequency_hz: NOMINAL_FREQUENCY_HZ,
                load_mw: 0.0,
                supply_mw: 0.0,
                customers: self.simulation.customers,
                is_running: true,
                tick_speed: self.simulation.tick_speed,
                frequency_history: Vec::new(),
                pid: PidController::new(self.pid.kp, self.pid.ki, self.pid.kd),
            },
            market: MarketState::default(),
            sustainability: SustainabilityState::default(),
            balance: self.simulation.initial_balance,
            initial_balance: self.simulation.initial_balance,
            iteration: 0,
            clock: SimClock::start(),
            deviation_sum_hz: 0.0,
            peak_customers: self.simulation.customers,
            next_generator_id: next_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_baseline() {
        let cfg = ScenarioConfig::from_preset("baseline");
        assert!(cfg.is_ok());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
seed = 99
tick_speed = 4
initial_balance = 50000.0
customers = 250000

[pid]
kp = 0.8
ki = 0.2
kd = 0.1

[battery]
capacity_mwh = 80.0
charge_mwh = 20.0
max_rate_mw = 10.0
efficiency = 0.9

[portfolio]
generators = ["nuclear", "solar", "solar"]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.customers), Some(250_000));
        assert_eq!(
            cfg.as_ref().map(|c| c.portfolio.generators.len()),
            Some(3)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
seed = 1
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.tick_speed), Some(1));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_mwh), Some(40.0));
    }

    #[test]
    fn validation_catches_zero_tick_speed() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.tick_speed = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.tick_speed"));
    }

    #[test]
    fn validation_catches_negative_gain() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.pid.ki = -0.1;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pid.ki"));
    }

    #[test]
    fn validation_catches_overfull_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.charge_mwh = cfg.battery.capacity_mwh + 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.charge_mwh"));
    }

    #[test]
    fn validation_catches_unknown_generator_type() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.portfolio.generators.push("fusion".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "portfolio.generators"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn build_state_matches_config() {
        let cfg = ScenarioConfig::baseline();
        let state = cfg.build_state();
        assert_eq!(state.generators.len(), 3);
        assert_eq!(state.generators[0].kind, GeneratorType::Coal);
        assert_eq!(state.network.customers, 100_000);
        assert_eq!(state.balance, 10_000.0);
        assert_eq!(state.battery.charge_mwh, 10.0);
        assert_eq!(state.next_generator_id, 4);
        assert!(state.network.is_running);
        assert_eq!(state.network.frequency_hz, 50.0);
    }

    #[test]
    fn renewable_heavy_has_more_storage() {
        let base = ScenarioConfig::baseline();
        let green = ScenarioConfig::renewable_heavy();
        assert!(green.battery.capacity_mwh > base.battery.capacity_mwh);
        assert!(green
            .portfolio
            .generators
            .iter()
            .all(|g| matches!(g.as_str(), "solar" | "wind" | "hydro")));
    }
}
