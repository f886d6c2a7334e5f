//! Simulation driver tests.

/// End-to-end runs through the reference accelerator.
pub mod simulator;
