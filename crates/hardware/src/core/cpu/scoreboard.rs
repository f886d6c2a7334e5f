//! Id-based scoreboard for register dependency tracking.
//!
//! Maps each architectural register to the xif id of its latest in-flight
//! producer, or `None` if the value is in the register file. The core
//! consults it before offering an instruction for issue.

use crate::common::constants::NUM_REGS;
use crate::core::xif::tracker::InstrId;

/// Maps each register to the offloaded instruction that will write it.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    /// x0 is always `None` (hardwired zero).
    gpr: [Option<InstrId>; NUM_REGS],
}

impl Scoreboard {
    /// Creates a scoreboard with no pending writers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `reg` as written by `id`. No-op for x0.
    pub fn set_producer(&mut self, reg: usize, id: InstrId) {
        if reg != 0
            && let Some(slot) = self.gpr.get_mut(reg)
        {
            *slot = Some(id);
        }
    }

    /// Pending writer of `reg`, if any.
    pub fn producer(&self, reg: usize) -> Option<InstrId> {
        self.gpr.get(reg).copied().flatten()
    }

    /// Clears `reg`, but only if `id` is still its latest writer.
    pub fn clear_if_match(&mut self, reg: usize, id: InstrId) {
        if let Some(slot) = self.gpr.get_mut(reg)
            && *slot == Some(id)
        {
            *slot = None;
        }
    }

    /// Clears every register whose latest writer is `id` (used on kill).
    pub fn clear_id(&mut self, id: InstrId) {
        for slot in &mut self.gpr {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }

    /// True if any of `regs` has a pending writer.
    pub fn any_pending(&self, regs: &[usize]) -> bool {
        regs.iter().any(|&reg| self.producer(reg).is_some())
    }

    /// True if no register has a pending writer.
    pub fn is_clear(&self) -> bool {
        self.gpr.iter().all(Option::is_none)
    }
}
