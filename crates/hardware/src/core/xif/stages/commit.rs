//! Commit stage.
//!
//! Signals commit or kill for an accepted instruction, exactly once. A kill
//! drops the result obligation; the record lingers only while accepted
//! memory requests are still outstanding, since those always complete.

use tracing::debug;

use crate::common::error::XifResult;
use crate::core::xif::arbiter::XifArbiter;
use crate::core::xif::signals::{CommitRequest, Stage};
use crate::core::xif::tracker::{InstrId, XifState};

impl XifArbiter {
    /// Commits (`kill = false`) or kills (`kill = true`) the instruction `id`.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` unless `id` is live and accepted but not yet
    /// committed or killed; the latched fault after an earlier fatal error.
    pub fn commit(&mut self, id: InstrId, kill: bool) -> XifResult<()> {
        self.ensure_running()?;
        match self.tracker.get(id).map(|record| record.state) {
            None => {
                return self.violation(
                    Stage::Commit,
                    id,
                    "id is not in flight; only accepted instructions can be committed",
                );
            }
            Some(XifState::Decoded) => {
                return self.violation(
                    Stage::Commit,
                    id,
                    "commit before the issue handshake accepted the instruction",
                );
            }
            Some(XifState::Committed | XifState::Killed) => {
                return self.violation(Stage::Commit, id, "commit/kill already observed");
            }
            Some(XifState::Accepted) => {}
        }

        self.coprocessor.commit(&CommitRequest { id, kill });

        let record = self.tracker.lookup_mut(id)?;
        if kill {
            record.state = XifState::Killed;
            record.result_pending = false;
            let drained = record.mem_pending.is_empty();
            self.stats.killed += 1;
            debug!(cycle = self.cycle, %id, drained, "killed");
            if drained {
                let _ = self.tracker.release(id)?;
            }
        } else {
            record.state = XifState::Committed;
            self.stats.committed += 1;
            debug!(cycle = self.cycle, %id, "committed");
        }
        Ok(())
    }
}
