//! Integer Register File.
//!
//! This module provides the `RegisterFile` struct holding the 32 architectural
//! integer registers of the RV32 core. It provides:
//! 1. **Storage:** Maintains `x0`-`x31` as 32-bit values.
//! 2. **Invariant Enforcement:** Register `x0` is hardwired to zero.
//! 3. **Observability:** Dumping register state for traces and the CLI report.

use super::constants::NUM_REGS;

/// RV32 integer register file.
///
/// Written by the core when the extension's result is accepted, read when an
/// offloaded instruction's source operands are sampled at issue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register. Register `x0` always returns 0.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a register. Writes to `x0` are ignored.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The 32-bit value to write.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Returns `(index, value)` for every non-zero register.
    pub fn non_zero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.regs
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, val)| val != 0)
    }

    /// Dumps all registers to stdout, four per line.
    pub fn dump(&self) {
        for i in (0..NUM_REGS).step_by(4) {
            println!(
                "x{:<2}={:#010x} x{:<2}={:#010x} x{:<2}={:#010x} x{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            );
        }
    }
}
