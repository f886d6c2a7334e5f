//! Issue stage.
//!
//! Offers an allocated instruction to the extension. `ready=false` leaves the
//! record untouched so the same id can be re-offered; once the handshake
//! completes the decision is latched: accepted records move on, rejected
//! records are released on the spot.

use tracing::debug;

use crate::common::error::{XifError, XifResult};
use crate::core::xif::arbiter::XifArbiter;
use crate::core::xif::signals::{IssueRequest, IssueResponse, Stage};
use crate::core::xif::tracker::{InstrId, XifState};

impl XifArbiter {
    /// Offers the instruction allocated as `id` on the issue channel.
    ///
    /// # Errors
    ///
    /// `UnknownId` if `id` is not live, `ProtocolViolation` if its issue
    /// decision was already made, or the latched fault.
    pub fn offer_issue(&mut self, id: InstrId) -> XifResult<IssueResponse> {
        self.ensure_running()?;
        let (state, request) = match self.tracker.get(id) {
            Some(record) => (
                record.state,
                IssueRequest {
                    id,
                    instr: record.instr,
                    rs: record.rs,
                    compressed: record.compressed,
                },
            ),
            None => return self.fail(XifError::UnknownId(id)),
        };
        if state != XifState::Decoded {
            return self.violation(Stage::Issue, id, "issue decision already latched");
        }
        if !self.budget.available(Stage::Issue) {
            self.stats.issue_stalls += 1;
            return Ok(IssueResponse::stall());
        }

        let response = self.coprocessor.issue(&request);
        if !response.ready {
            self.stats.issue_stalls += 1;
            debug!(cycle = self.cycle, %id, "issue not ready");
            return Ok(IssueResponse::stall());
        }

        self.budget.consume(Stage::Issue);
        self.stats.issue_offered += 1;
        if response.accept {
            let record = self.tracker.lookup_mut(id)?;
            record.state = XifState::Accepted;
            record.writeback = response.writeback;
            record.loadstore = response.loadstore;
            record.result_pending = true;
            self.stats.issue_accepted += 1;
            debug!(
                cycle = self.cycle,
                %id,
                instr = request.instr,
                writeback = response.writeback,
                loadstore = response.loadstore,
                "issue accepted"
            );
            Ok(IssueResponse::accept(response.writeback, response.loadstore))
        } else {
            let _ = self.tracker.release(id)?;
            self.stats.issue_rejected += 1;
            debug!(cycle = self.cycle, %id, instr = request.instr, "issue rejected");
            Ok(IssueResponse::reject())
        }
    }
}
