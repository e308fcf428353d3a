//! Discrete-time power-grid operating simulator.

/// Generation units and battery storage.
pub mod assets;
pub mod config;
pub mod io;
/// Market data providers and deviation-based pricing.
pub mod market;
pub mod runner;
/// Tick engine, controller, dynamics, and accounting modules.
pub mod sim;
pub mod store;
