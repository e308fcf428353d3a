//! Emissions and renewable-share accounting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::{Generator, GeneratorType};

/// Instantaneous and cumulative sustainability metrics.
///
/// Cumulative fields add the current-tick value unconditionally every tick
/// (including zero-generation ticks) and therefore never decrease within a
/// run; `max_renewable_percentage` is a running maximum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityState {
    /// Emissions this tick in kg CO₂.
    pub current_emissions_kg: f64,
    /// Total emissions since the run started in kg CO₂.
    pub cumulative_emissions_kg: f64,
    /// Total generation this tick in MW.
    pub current_generation_mw: f64,
    /// Total energy generated since the run started in MWh (one hour per tick).
    pub cumulative_generation_mwh: f64,
    /// Renewable generation this tick in MW.
    pub renewable_generation_mw: f64,
    /// Best renewable share achieved so far, in percent.
    pub max_renewable_percentage: f64,
    /// This tick's generation mix, summed per type.
    pub generation_mix_mw: BTreeMap<GeneratorType, f64>,
}

impl SustainabilityState {
    /// Folds one tick of generator outputs into the metrics.
    pub fn record_tick(&mut self, generators: &[Generator]) {
        let mut total_mw = 0.0;
        let mut renewable_mw = 0.0;
        let mut emissions_kg = 0.0;
        let mut mix: BTreeMap<GeneratorType, f64> = BTreeMap::new();

        for generator in generators {
            let output = generator.current_output_mw;
            total_mw += output;
            if generator.kind.is_renewable() {
                renewable_mw += output;
            }
            emissions_kg += output * generator.kind.emission_factor_kg_per_mwh();
            // sum, not overwrite: multiple units of a type aggregate
            *mix.entry(generator.kind).or_insert(0.0) += output;
        }

        self.current_emissions_kg = emissions_kg;
        self.cumulative_emissions_kg += emissions_kg;
        self.current_generation_mw = total_mw;
        self.cumulative_generation_mwh += total_mw;
        self.renewable_generation_mw = renewable_mw;
        self.max_renewable_percentage = self
            .max_renewable_percentage
            .max(renewable_share_pct(renewable_mw, total_mw));
        self.generation_mix_mw = mix;
    }

    /// Renewable share of this tick's generation, 0% when nothing ran.
    pub fn current_renewable_percentage(&self) -> f64 {
        renewable_share_pct(self.renewable_generation_mw, self.current_generation_mw)
    }
}

fn renewable_share_pct(renewable_mw: f64, total_mw: f64) -> f64 {
    if total_mw > 0.0 {
        renewable_mw / total_mw * 100.0
    } else {
        0.0
    }
}
