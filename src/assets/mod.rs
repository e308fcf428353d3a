//! Physical assets owned by the grid operator.

/// Grid-scale battery storage model.
pub mod battery;
/// Generation units and the per-type specification table.
pub mod generator;

pub use battery::Battery;
pub use generator::Generator;
pub use generator::GeneratorType;
