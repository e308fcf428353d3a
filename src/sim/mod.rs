/// Simulated calendar clock.
pub mod clock;
pub mod dispatch;
pub mod engine;
pub mod financials;
/// Swing-equation frequency dynamics.
pub mod frequency;
pub mod inertia;
/// Closed-loop frequency controller.
pub mod pid;
pub mod state;
pub mod summary;
pub mod sustainability;

/// Nominal grid frequency in Hz.
pub const NOMINAL_FREQUENCY_HZ: f64 = 50.0;
