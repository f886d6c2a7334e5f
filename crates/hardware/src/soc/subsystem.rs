//! CPU subsystem wrapper.
//!
//! Ties the core, the extension-interface arbiter and the subsystem's
//! external pins together. One `tick` is one clock cycle: the core fetches,
//! then the arbiter evaluates every xif channel against the core.

use tracing::trace;

use crate::common::error::SimError;
use crate::core::cpu::Core;
use crate::core::xif::arbiter::XifArbiter;
use crate::soc::interrupts::{self, IrqLines};
use crate::stats::SimStats;

/// The CPU subsystem: core, extension interface and external pins.
#[derive(Debug)]
pub struct CpuSubsystem {
    /// Core side of the extension interface.
    pub core: Core,
    /// Extension interface protocol arbiter with the attached accelerator.
    pub arbiter: XifArbiter,
    irq: IrqLines,
    debug_req: bool,
}

impl CpuSubsystem {
    /// Wraps `core` and `arbiter`.
    pub const fn new(core: Core, arbiter: XifArbiter) -> Self {
        Self {
            core,
            arbiter,
            irq: IrqLines::new(0),
            debug_req: false,
        }
    }

    /// Advances one clock cycle.
    ///
    /// # Errors
    ///
    /// Instruction or data port faults, or the protocol fault latched by the arbiter.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.core.fetch()?;
        self.arbiter.evaluate(&mut self.core)?;
        trace!(cycle = self.arbiter.cycle(), pc = self.core.pc, "tick");
        Ok(())
    }

    /// Sleep output: the core has nothing left to do and the interface is drained.
    pub fn sleep(&self) -> bool {
        self.core.is_idle() && self.arbiter.is_drained()
    }

    /// Drives the interrupt input vector.
    pub const fn set_irq(&mut self, vector: u32) {
        self.irq = IrqLines::new(vector);
    }

    /// Sampled interrupt input.
    pub const fn irq(&self) -> IrqLines {
        self.irq
    }

    /// Interrupt acknowledge output.
    pub const fn irq_ack(&self) -> bool {
        interrupts::irq_ack()
    }

    /// Acknowledged interrupt id output.
    pub const fn irq_id(&self) -> u8 {
        interrupts::irq_id()
    }

    /// Drives the debug request input.
    pub const fn set_debug_req(&mut self, level: bool) {
        self.debug_req = level;
    }

    /// Debug request input as last driven.
    pub const fn debug_req(&self) -> bool {
        self.debug_req
    }

    /// Protocol statistics with the core's counters folded in.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.arbiter.stats().clone();
        let core = &self.core.stats;
        stats.fetches = self.core.instr_port.fetches();
        stats.offloaded = core.offloaded;
        stats.native_instructions = core.native_instructions;
        stats.hazard_stalls = core.hazard_stalls;
        stats.writebacks = core.writebacks;
        stats
    }
}
