//! Common utilities and types used throughout the subsystem simulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Instruction field layout, custom opcodes, interrupt bit assignment.
//! 2. **Error Handling:** Protocol faults (`XifError`) and simulation failures (`SimError`).
//! 3. **Register Management:** The RV32 integer register file.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for the protocol model and the simulation driver.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use error::{SimError, XifError, XifResult};
pub use reg::RegisterFile;
