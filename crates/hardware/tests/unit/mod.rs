//! # Unit Components
//!
//! Per-component tests of the subsystem simulator, grouped the way the
//! library is laid out.


/// Core host model and reference accelerator.
pub mod core;

/// Custom-0 encodings, `c.xadd` expansion and disassembly.
pub mod isa;


/// Scenario loading and end-to-end runs.
pub mod sim;



/// Statistics counters and derived metrics.
pub mod stats;
