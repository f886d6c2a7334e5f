//! Memory request and memory result stages.
//!
//! The extension issues loads and stores through the core's data port. Each
//! accepted request is queued on its instruction's record; responses must
//! come back in that per-id order. Requests of different ids interleave
//! freely.

use tracing::debug;

use crate::common::error::XifResult;
use crate::core::xif::arbiter::XifArbiter;
use crate::core::xif::signals::{Handshake, MemRequest, MemResponse, MemResult, Stage};
use crate::core::xif::tracker::{InstrId, XifState};

impl XifArbiter {
    /// Presents `request` on the memory request channel.
    ///
    /// Returns `Stalled` when the data port does not grant this step; the
    /// extension must hold the request and retry.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if the instruction is not in flight, not accepted,
    /// killed, or did not announce memory traffic at issue; the latched fault.
    pub fn request_memory(&mut self, request: MemRequest) -> XifResult<Handshake> {
        self.ensure_running()?;
        let id = request.id;
        match self
            .tracker
            .get(id)
            .map(|record| (record.state, record.loadstore))
        {
            None => {
                return self.violation(Stage::MemRequest, id, "id is not in flight");
            }
            Some((XifState::Decoded, _)) => {
                return self.violation(
                    Stage::MemRequest,
                    id,
                    "memory request before the issue handshake accepted the instruction",
                );
            }
            Some((XifState::Killed, _)) => {
                return self.violation(
                    Stage::MemRequest,
                    id,
                    "memory request for a killed instruction",
                );
            }
            Some((_, false)) => {
                return self.violation(
                    Stage::MemRequest,
                    id,
                    "issue response did not announce memory traffic",
                );
            }
            Some((XifState::Accepted | XifState::Committed, true)) => {}
        }

        if !self.budget.available(Stage::MemRequest) || !self.mem_ready.is_ready(self.cycle) {
            self.stats.mem_stalls += 1;
            return Ok(Handshake::Stalled);
        }

        self.budget.consume(Stage::MemRequest);
        let record = self.tracker.lookup_mut(id)?;
        record.mem_pending.push_back(request);
        let pending = record.mem_pending.len();
        self.stats.mem_requests += 1;
        debug!(
            cycle = self.cycle,
            %id,
            addr = request.addr,
            we = request.we,
            pending,
            "memory request accepted"
        );
        Ok(Handshake::Accepted)
    }

    /// Completes the oldest outstanding memory request of `id` with `response`.
    ///
    /// The result is forwarded to the extension and returned. For a killed
    /// instruction it is discarded instead (`Ok(None)`), and the record is
    /// released once nothing is outstanding.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if `id` has no outstanding request or `response`
    /// does not match the kind of the oldest one; the latched fault.
    pub fn complete_memory(
        &mut self,
        id: InstrId,
        response: MemResponse,
    ) -> XifResult<Option<MemResult>> {
        self.ensure_running()?;
        let oldest = self
            .tracker
            .get(id)
            .map(|record| (record.state, record.mem_pending.front().copied()));
        let (state, request) = match oldest {
            None => {
                return self.violation(
                    Stage::MemResult,
                    id,
                    "no memory request outstanding: id is not in flight",
                );
            }
            Some((_, None)) => {
                return self.violation(Stage::MemResult, id, "no memory request outstanding");
            }
            Some((state, Some(request))) => (state, request),
        };
        if request.we != response.is_write() {
            let expected = if request.we { "write ack" } else { "read data" };
            return self.violation(
                Stage::MemResult,
                id,
                format!(
                    "response does not match the oldest outstanding request to {:#010x} (expected {expected})",
                    request.addr
                ),
            );
        }

        let record = self.tracker.lookup_mut(id)?;
        let _ = record.mem_pending.pop_front();
        let drained = record.mem_pending.is_empty();
        let result = MemResult {
            id,
            rdata: response.rdata(),
            request,
        };

        if state == XifState::Killed {
            self.stats.mem_discarded += 1;
            debug!(cycle = self.cycle, %id, drained, "memory result discarded (killed)");
            if drained {
                let _ = self.tracker.release(id)?;
            }
            return Ok(None);
        }

        self.coprocessor.mem_result(&result);
        self.stats.mem_results += 1;
        debug!(cycle = self.cycle, %id, rdata = result.rdata, "memory result delivered");
        Ok(Some(result))
    }
}
