//! End-of-run summary computation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::SimulationState;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The operator stopped the run.
    Manual,
    /// Frequency deviation exceeded the collapse threshold.
    NetworkFailure,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Manual => write!(f, "manual stop"),
            EndReason::NetworkFailure => write!(f, "network failure"),
        }
    }
}

/// Aggregate performance of a completed run.
///
/// Computed from the final `SimulationState` so stored summaries always
/// agree with the state they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks completed before the run ended.
    pub duration_ticks: u64,
    /// Final balance minus starting balance, in dollars.
    pub money_made: f64,
    /// Mean absolute deviation from nominal frequency, in Hz.
    pub average_frequency_deviation_hz: f64,
    /// Best renewable share achieved, in percent.
    pub max_renewable_percentage: f64,
    /// Total emissions over the run in kg CO₂.
    pub total_emissions_kg: f64,
    /// Total energy generated over the run in MWh.
    pub total_generation_mwh: f64,
    /// Emissions per unit of generation in kg CO₂/MWh.
    pub grid_intensity_kg_per_mwh: f64,
    /// Largest customer count reached.
    pub peak_customers: u64,
    /// Why the run ended.
    pub end_reason: EndReason,
}

impl RunSummary {
    /// Derives the summary from a run's final state.
    pub fn from_state(state: &SimulationState, end_reason: EndReason) -> Self {
        let average_frequency_deviation_hz = if state.iteration > 0 {
            state.deviation_sum_hz / state.iteration as f64
        } else {
            0.0
        };

        let total_emissions_kg = state.sustainability.cumulative_emissions_kg;
        let total_generation_mwh = state.sustainability.cumulative_generation_mwh;
        let grid_intensity_kg_per_mwh = if total_generation_mwh > 0.0 {
            total_emissions_kg / total_generation_mwh
        } else {
            0.0
        };

        Self {
            duration_ticks: state.iteration,
            money_made: state.balance - state.initial_balance,
            average_frequency_deviation_hz,
            max_renewable_percentage: state.sustainability.max_renewable_percentage,
            total_emissions_kg,
            total_generation_mwh,
            grid_intensity_kg_per_mwh,
            peak_customers: state.peak_customers,
            end_reason,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Duration:              {} ticks", self.duration_ticks)?;
        writeln!(f, "Money made:            ${:.2}", self.money_made)?;
        writeln!(
            f,
            "Avg freq deviation:    {:.4} Hz",
            self.average_frequency_deviation_hz
        )?;
        writeln!(
            f,
            "Max renewable share:   {:.1}%",
            self.max_renewable_percentage
        )?;
        writeln!(
            f,
            "Total emissions:       {:.1} kg CO2 ({:.1} kg/MWh over {:.1} MWh)",
            self.total_emissions_kg, self.grid_intensity_kg_per_mwh, self.total_generation_mwh
        )?;
        writeln!(f, "Peak customers:        {}", self.peak_customers)?;
        write!(f, "End reason:            {}", self.end_reason)
    }
}
