//! Simulation driver.
//!
//! Loads scenarios and runs the subsystem until it drains.

/// Scenario parsing and assembly.
pub mod loader;

/// Top-level simulator.
pub mod simulator;

pub use loader::Scenario;
pub use simulator::{RunSummary, Simulator};
