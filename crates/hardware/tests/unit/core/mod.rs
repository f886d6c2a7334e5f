//! Core host model and reference accelerator tests.

/// Fetch routing, hazards, commit scheduling and writeback.
pub mod host;
