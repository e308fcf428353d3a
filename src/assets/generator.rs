//! Generation assets and the fixed per-type specification table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generation technology of an owned unit.
///
/// Each type carries a fixed specification: nameplate capacity, economics,
/// an inertia constant, and a lifecycle emission factor. Solar and wind are
/// availability-driven; every other type is dispatchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    Solar,
    Wind,
    Nuclear,
    Coal,
    Hydro,
}

impl GeneratorType {
    /// All purchasable generator types.
    pub const ALL: [GeneratorType; 5] = [
        GeneratorType::Solar,
        GeneratorType::Wind,
        GeneratorType::Nuclear,
        GeneratorType::Coal,
        GeneratorType::Hydro,
    ];

    /// Nameplate capacity of one unit in MW.
    pub fn capacity_mw(self) -> f64 {
        match self {
            GeneratorType::Solar => 100.0,
            GeneratorType::Wind => 150.0,
            GeneratorType::Nuclear => 1000.0,
            GeneratorType::Coal => 500.0,
            GeneratorType::Hydro => 300.0,
        }
    }

    /// One-time purchase price in dollars.
    pub fn acquisition_cost(self) -> f64 {
        match self {
            GeneratorType::Solar => 1000.0,
            GeneratorType::Wind => 1500.0,
            GeneratorType::Nuclear => 10000.0,
            GeneratorType::Coal => 3000.0,
            GeneratorType::Hydro => 4000.0,
        }
    }

    /// Variable operating cost in dollars per MWh produced.
    pub fn variable_cost_per_mwh(self) -> f64 {
        match self {
            GeneratorType::Solar => 2.0,
            GeneratorType::Wind => 3.0,
            GeneratorType::Nuclear => 10.0,
            GeneratorType::Coal => 25.0,
            GeneratorType::Hydro => 5.0,
        }
    }

    /// Fixed operating cost in dollars per simulated hour, paid regardless
    /// of output.
    pub fn hourly_fixed_cost(self) -> f64 {
        match self {
            GeneratorType::Solar => 10.0,
            GeneratorType::Wind => 15.0,
            GeneratorType::Nuclear => 200.0,
            GeneratorType::Coal => 100.0,
            GeneratorType::Hydro => 50.0,
        }
    }

    /// Inertia constant H in seconds. Inverter-based solar contributes no
    /// rotating mass.
    pub fn inertia_constant_s(self) -> f64 {
        match self {
            GeneratorType::Solar => 0.0,
            GeneratorType::Wind => 0.5,
            GeneratorType::Nuclear => 6.5,
            GeneratorType::Coal => 4.0,
            GeneratorType::Hydro => 3.0,
        }
    }

    /// Lifecycle emission factor in kg CO₂ per MWh.
    pub fn emission_factor_kg_per_mwh(self) -> f64 {
        match self {
            GeneratorType::Solar => 41.0,
            GeneratorType::Wind => 11.0,
            GeneratorType::Nuclear => 12.0,
            GeneratorType::Coal => 820.0,
            GeneratorType::Hydro => 24.0,
        }
    }

    /// Whether the type counts toward the renewable generation share.
    pub fn is_renewable(self) -> bool {
        matches!(
            self,
            GeneratorType::Solar | GeneratorType::Wind | GeneratorType::Hydro
        )
    }

    /// Whether output follows the frequency-correction signal rather than
    /// exogenous availability.
    pub fn is_dispatchable(self) -> bool {
        !matches!(self, GeneratorType::Solar | GeneratorType::Wind)
    }

    /// Lowercase type name as used in scenario files.
    pub fn name(self) -> &'static str {
        match self {
            GeneratorType::Solar => "solar",
            GeneratorType::Wind => "wind",
            GeneratorType::Nuclear => "nuclear",
            GeneratorType::Coal => "coal",
            GeneratorType::Hydro => "hydro",
        }
    }

    /// Parses a lowercase type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "solar" => Some(GeneratorType::Solar),
            "wind" => Some(GeneratorType::Wind),
            "nuclear" => Some(GeneratorType::Nuclear),
            "coal" => Some(GeneratorType::Coal),
            "hydro" => Some(GeneratorType::Hydro),
            _ => None,
        }
    }
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned generation unit.
///
/// Capacity and economics are fixed at purchase from the type table;
/// `current_output_mw` is recomputed every tick by the dispatch step and
/// always stays within `[0, capacity_mw]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    /// Unique id within one simulation run.
    pub id: u32,
    /// Generation technology.
    pub kind: GeneratorType,
    /// Nameplate capacity in MW.
    pub capacity_mw: f64,
    /// Output during the most recent tick in MW.
    pub current_output_mw: f64,
}

impl Generator {
    /// Creates a new unit of the given type at zero output.
    pub fn new(id: u32, kind: GeneratorType) -> Self {
        Self {
            id,
            kind,
            capacity_mw: kind.capacity_mw(),
            current_output_mw: 0.0,
        }
    }
}
