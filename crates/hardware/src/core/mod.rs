//! Core processor and its extension interface.
//!
//! This module contains the CPU core model, the extension interface protocol
//! that connects it to an accelerator, and the reference accelerator itself.

/// Reference accelerator for the custom-0 instructions.
pub mod accel;

/// CPU core model (fetch, hazards, commit, data port, writeback).
pub mod cpu;

/// Extension interface protocol (tracker, stages, arbiter).
pub mod xif;

pub use self::accel::Accelerator;
pub use self::cpu::Core;
pub use self::xif::XifArbiter;
