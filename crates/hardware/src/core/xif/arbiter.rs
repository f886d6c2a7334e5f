//! Protocol arbiter.
//!
//! The arbiter is the single entry point of the extension-interface model.
//! It provides:
//! 1. **Ownership:** The instruction tracker, the coprocessor, and the per-step channel state.
//! 2. **Stage contracts:** Implemented in `stages/` as methods on `XifArbiter`.
//! 3. **Ordering:** `evaluate` runs one step in the fixed order compressed → issue →
//!    commit → memory request → memory result → result, then advances time.
//! 4. **Fault latching:** The first fatal error is kept; every later call fails with it.

use std::fmt;

use tracing::{error, trace, warn};

use crate::common::error::{XifError, XifResult};
use crate::config::{ReadyPolicy, XifConfig};
use crate::core::xif::coprocessor::Coprocessor;
use crate::core::xif::host::XifHost;
use crate::core::xif::signals::{ResultHandshake, Stage};
use crate::core::xif::tracker::{InstrId, InstructionRecord, InstructionTracker, OffloadCandidate};
use crate::stats::SimStats;

/// Handshakes completed on the ready-bearing channels during the current step.
///
/// Each of these channels completes at most one transaction per cycle.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChannelBudget {
    compressed: bool,
    issue: bool,
    mem_request: bool,
    result: bool,
}

impl ChannelBudget {
    fn slot(&mut self, stage: Stage) -> Option<&mut bool> {
        match stage {
            Stage::Compressed => Some(&mut self.compressed),
            Stage::Issue => Some(&mut self.issue),
            Stage::MemRequest => Some(&mut self.mem_request),
            Stage::Result => Some(&mut self.result),
            Stage::Commit | Stage::MemResult => None,
        }
    }

    /// True if `stage` has not completed a handshake this step.
    pub(crate) fn available(&mut self, stage: Stage) -> bool {
        self.slot(stage).is_none_or(|used| !*used)
    }

    /// Marks `stage` as having completed its handshake this step.
    pub(crate) fn consume(&mut self, stage: Stage) {
        if let Some(used) = self.slot(stage) {
            *used = true;
        }
    }
}

/// Extension-interface protocol arbiter.
pub struct XifArbiter {
    pub(crate) tracker: InstructionTracker,
    pub(crate) coprocessor: Box<dyn Coprocessor>,
    pub(crate) mem_ready: ReadyPolicy,
    pub(crate) result_ready: ReadyPolicy,
    pub(crate) budget: ChannelBudget,
    /// Allocated candidate whose issue offer has not completed yet.
    pending_issue: Option<InstrId>,
    pub(crate) cycle: u64,
    pub(crate) stats: SimStats,
    fault: Option<XifError>,
}

impl fmt::Debug for XifArbiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XifArbiter")
            .field("cycle", &self.cycle)
            .field("coprocessor", &self.coprocessor.name())
            .field("tracker", &self.tracker)
            .field("pending_issue", &self.pending_issue)
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

impl XifArbiter {
    /// Creates an arbiter in front of `coprocessor`.
    pub fn new(config: &XifConfig, coprocessor: Box<dyn Coprocessor>) -> Self {
        Self {
            tracker: InstructionTracker::new(config.capacity),
            coprocessor,
            mem_ready: config.mem_ready,
            result_ready: config.result_ready,
            budget: ChannelBudget::default(),
            pending_issue: None,
            cycle: 0,
            stats: SimStats::default(),
            fault: None,
        }
    }

    /// Current step number.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Collected statistics.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The in-flight instruction table.
    pub const fn tracker(&self) -> &InstructionTracker {
        &self.tracker
    }

    /// The attached extension.
    pub fn coprocessor(&self) -> &dyn Coprocessor {
        self.coprocessor.as_ref()
    }

    /// The fault that aborted this run, if any.
    pub const fn fault(&self) -> Option<&XifError> {
        self.fault.as_ref()
    }

    /// True when nothing is tracked, nothing waits for issue, and the extension is idle.
    pub fn is_drained(&self) -> bool {
        self.tracker.is_empty() && self.pending_issue.is_none() && self.coprocessor.is_idle()
    }

    /// Creates a tracker record for `candidate`.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if the tracker is full (not latched as a fault), or
    /// the latched fault.
    pub fn allocate(&mut self, candidate: OffloadCandidate) -> XifResult<InstrId> {
        self.ensure_running()?;
        let id = self.tracker.allocate(candidate)?;
        self.stats.peak_in_flight = self.stats.peak_in_flight.max(self.tracker.len());
        Ok(id)
    }

    /// Returns the record of a live id.
    ///
    /// A read-only query: an unknown id is reported but not latched as a
    /// fault, since nothing on the interface was driven. Stage calls and
    /// `offer_issue` latch instead.
    ///
    /// # Errors
    ///
    /// `UnknownId` if `id` is not live.
    pub fn lookup(&self, id: InstrId) -> XifResult<&InstructionRecord> {
        self.tracker.lookup(id)
    }

    /// Ends the current step: the extension ticks and channel budgets reset.
    ///
    /// # Errors
    ///
    /// The latched fault; time does not advance past a fault.
    pub fn step(&mut self) -> XifResult<u64> {
        self.ensure_running()?;
        self.coprocessor.tick();
        self.budget = ChannelBudget::default();
        self.cycle += 1;
        self.stats.cycles = self.cycle;
        trace!(cycle = self.cycle, in_flight = self.tracker.len(), "step");
        Ok(self.cycle)
    }

    /// Runs one full step against `host` in the fixed stage order, then advances time.
    ///
    /// # Errors
    ///
    /// Any protocol fault (converted into the host's error type) or a host port error.
    pub fn evaluate<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        self.evaluate_compressed(host)?;
        self.evaluate_issue(host)?;
        self.evaluate_commit(host)?;
        self.evaluate_mem_request(host)?;
        self.evaluate_mem_result(host)?;
        self.evaluate_result(host)?;
        let _ = self.step()?;
        Ok(())
    }

    fn evaluate_compressed<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        if let Some(raw) = host.compressed_offer() {
            let response = self.offer_compressed(raw)?;
            if response.ready {
                host.compressed_done(response);
            }
        }
        Ok(())
    }

    fn evaluate_issue<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        let id = match self.pending_issue {
            Some(id) => id,
            None => {
                let Some(candidate) = host.issue_offer() else {
                    return Ok(());
                };
                match self.allocate(candidate) {
                    Ok(id) => id,
                    Err(XifError::CapacityExceeded { capacity }) => {
                        self.stats.capacity_stalls += 1;
                        warn!(cycle = self.cycle, capacity, "issue stalled: tracker full");
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let response = self.offer_issue(id)?;
        if response.ready {
            self.pending_issue = None;
            host.issue_done(id, response, self.cycle);
        } else {
            self.pending_issue = Some(id);
        }
        Ok(())
    }

    fn evaluate_commit<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        if let Some(commit) = host.commit_offer(self.cycle) {
            self.commit(commit.id, commit.kill)?;
        }
        Ok(())
    }

    fn evaluate_mem_request<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        if let Some(request) = self.coprocessor.mem_request()
            && self.request_memory(request)?.is_accepted()
        {
            self.coprocessor.mem_request_accepted();
            host.data_request(request, self.cycle)?;
        }
        Ok(())
    }

    fn evaluate_mem_result<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        if let Some((id, response)) = host.data_response(self.cycle)? {
            let _ = self.complete_memory(id, response)?;
        }
        Ok(())
    }

    fn evaluate_result<H: XifHost>(&mut self, host: &mut H) -> Result<(), H::Error> {
        if let Some(payload) = self.coprocessor.result()
            && let ResultHandshake::Retired(retirement) =
                self.produce_result(payload.id, payload.data)?
        {
            self.coprocessor.result_accepted();
            host.writeback(retirement);
        }
        Ok(())
    }

    /// Fails with the latched fault, if any.
    pub(crate) fn ensure_running(&self) -> XifResult<()> {
        self.fault.as_ref().map_or(Ok(()), |fault| Err(fault.clone()))
    }

    /// Latches `err` if it is fatal and returns it.
    pub(crate) fn fail<T>(&mut self, err: XifError) -> XifResult<T> {
        if err.is_fatal() && self.fault.is_none() {
            error!(cycle = self.cycle, %err, "protocol fault, aborting run");
            self.fault = Some(err.clone());
        }
        Err(err)
    }

    /// Latches and returns a `ProtocolViolation` for `id` on `stage`.
    pub(crate) fn violation<T>(
        &mut self,
        stage: Stage,
        id: InstrId,
        reason: impl Into<String>,
    ) -> XifResult<T> {
        self.fail(XifError::violation(stage, id, reason))
    }
}
