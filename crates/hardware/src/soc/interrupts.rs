//! Interrupt input of the subsystem.
//!
//! The core receives a 32-bit interrupt vector: bit 3 software, bit 7
//! timer, bit 11 external and bits 16-31 the fast lines. Undefined bits are
//! dropped. The subsystem has no acknowledge path; its ack and id outputs
//! are constant stubs.

use crate::common::constants::{
    IRQ_EXTERNAL_BIT, IRQ_FAST_LINES, IRQ_FAST_SHIFT, IRQ_SOFTWARE_BIT, IRQ_TIMER_BIT,
    IRQ_WIRED_MASK,
};

/// Sampled interrupt input vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IrqLines(u32);

impl IrqLines {
    /// Samples `vector`, keeping only wired bits.
    pub const fn new(vector: u32) -> Self {
        Self(vector & IRQ_WIRED_MASK)
    }

    /// Raw masked vector.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Software interrupt line.
    pub const fn software(self) -> bool {
        self.0 & (1 << IRQ_SOFTWARE_BIT) != 0
    }

    /// Timer interrupt line.
    pub const fn timer(self) -> bool {
        self.0 & (1 << IRQ_TIMER_BIT) != 0
    }

    /// External interrupt line.
    pub const fn external(self) -> bool {
        self.0 & (1 << IRQ_EXTERNAL_BIT) != 0
    }

    /// Fast interrupt line `n` (0-15); out-of-range lines read as low.
    pub const fn fast(self, n: u32) -> bool {
        n < IRQ_FAST_LINES && self.0 & (1 << (IRQ_FAST_SHIFT + n)) != 0
    }

    /// True if any line is raised.
    pub const fn any(self) -> bool {
        self.0 != 0
    }
}

/// Interrupt acknowledge output. Not connected: always low.
pub const fn irq_ack() -> bool {
    false
}

/// Acknowledged interrupt id output. Not connected: always zero.
pub const fn irq_id() -> u8 {
    0
}
