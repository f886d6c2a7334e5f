//! Result stage.
//!
//! Takes the extension's value for a committed instruction whose memory
//! traffic has drained, and retires it.

use tracing::debug;

use crate::common::error::XifResult;
use crate::core::xif::arbiter::XifArbiter;
use crate::core::xif::signals::{ResultHandshake, Retirement, Stage};
use crate::core::xif::tracker::{InstrId, XifState};

impl XifArbiter {
    /// Presents the result `value` for `id`.
    ///
    /// On acceptance the instruction retires and its slot is freed.
    /// `Stalled` means the writeback port is busy this step.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if `id` is not in flight, was killed, was not
    /// committed, or still has outstanding memory requests; the latched fault.
    pub fn produce_result(&mut self, id: InstrId, value: u32) -> XifResult<ResultHandshake> {
        self.ensure_running()?;
        match self
            .tracker
            .get(id)
            .map(|record| (record.state, record.mem_pending_count()))
        {
            None => {
                return self.violation(
                    Stage::Result,
                    id,
                    "id is not in flight (retired, rejected, killed or never issued)",
                );
            }
            Some((XifState::Killed, _)) => {
                return self.violation(Stage::Result, id, "result for a killed instruction");
            }
            Some((XifState::Decoded | XifState::Accepted, _)) => {
                return self.violation(Stage::Result, id, "result before commit");
            }
            Some((XifState::Committed, outstanding)) if outstanding > 0 => {
                return self.violation(
                    Stage::Result,
                    id,
                    format!("{outstanding} memory request(s) still outstanding"),
                );
            }
            Some((XifState::Committed, _)) => {}
        }

        if !self.budget.available(Stage::Result) || !self.result_ready.is_ready(self.cycle) {
            self.stats.result_stalls += 1;
            return Ok(ResultHandshake::Stalled);
        }

        self.budget.consume(Stage::Result);
        let record = self.tracker.lookup_mut(id)?;
        record.result = Some(value);
        record.result_pending = false;
        let record = self.tracker.release(id)?;
        self.stats.retired += 1;

        let retirement = Retirement {
            id,
            instr: record.instr,
            value,
            rd: record.writeback.then(|| record.rd()),
        };
        debug!(cycle = self.cycle, %id, value, rd = ?retirement.rd, "retired");
        Ok(ResultHandshake::Retired(retirement))
    }
}
