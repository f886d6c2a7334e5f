//! CPU subsystem extension interface simulator library.
//!
//! This crate implements a cycle-level functional model of an RV32 CPU
//! subsystem with an accelerator attached through its extension interface:
//! 1. **Protocol:** The xif handshake (compressed, issue, commit, memory, result)
//!    with its ordering rules enforced by `XifArbiter`.
//! 2. **Core:** Fetch over the OBI instruction port, hazard tracking, commit and writeback.
//! 3. **Accelerator:** A reference coprocessor for the custom-0 instructions.
//! 4. **SoC:** Memory, OBI ports, interrupt input and the subsystem wrapper.
//! 5. **Simulation:** Scenario loading, configuration and statistics.

/// Common types and constants (errors, register file, encoding layout).
pub mod common;
/// Simulator configuration (defaults, backpressure policies, validation).
pub mod config;
/// Core, extension interface and reference accelerator.
pub mod core;
/// Instruction encodings (custom-0, compressed, disassembly).
pub mod isa;
/// Scenario loader and simulator.
pub mod sim;
/// Memory, OBI ports, interrupts and the subsystem wrapper.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Extension interface protocol arbiter.
pub use crate::core::XifArbiter;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
