//! System-on-Chip (SoC) Components.
//!
//! This module organizes the parts of the CPU subsystem outside the core:
//! the memory behind the OBI ports, the ports themselves, the interrupt
//! input and the wrapper that steps everything together.

/// Interrupt input vector and the stubbed acknowledge outputs.
pub mod interrupts;

/// Memory region behind both ports.
pub mod memory;

/// OBI instruction and data ports.
pub mod obi;

/// CPU subsystem wrapper.
pub mod subsystem;

pub use subsystem::CpuSubsystem;
