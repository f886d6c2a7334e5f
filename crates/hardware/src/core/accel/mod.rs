//! Reference accelerator.
//!
//! A small coprocessor executing the custom-0 instructions of
//! `isa::xcustom` behind the extension interface. It provides:
//! 1. **Compressed expansion:** `c.xadd` to `xadd` (when enabled).
//! 2. **Issue queue:** Up to `queue_depth` accepted instructions; issue stalls beyond that.
//! 3. **Memory sequencing:** Loads may go out before commit, stores only after.
//!    Requests leave in program order, one instruction's accesses at a time.
//! 4. **Accumulator:** `xmac` updates `acc` when it commits, never speculatively.
//! 5. **Results:** The oldest committed instruction whose memory traffic is
//!    done and whose latency has elapsed is presented first.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::AcceleratorConfig;
use crate::core::xif::coprocessor::Coprocessor;
use crate::core::xif::signals::{
    CommitRequest, CompressedRequest, CompressedResponse, IssueRequest, IssueResponse, MemRequest,
    MemResult, ResultPayload,
};
use crate::core::xif::tracker::InstrId;
use crate::isa::rvc::expand;
use crate::isa::xcustom::{XInstr, XOp, decode};

/// One accepted instruction.
#[derive(Clone, Debug)]
struct Entry {
    id: InstrId,
    instr: XInstr,
    rs: [u32; 3],
    committed: bool,
    /// Accesses not yet accepted by the core, in order.
    mem_plan: VecDeque<MemRequest>,
    /// Accepted accesses without a result.
    mem_outstanding: usize,
    /// Read data, in request order.
    loaded: Vec<u32>,
    /// Value fixed at commit (`xmac`).
    committed_value: Option<u32>,
    /// Cycle from which the result may be presented.
    ready_at: Option<u64>,
}

impl Entry {
    fn new(id: InstrId, instr: XInstr, rs: [u32; 3]) -> Self {
        let base = rs[0].wrapping_add_signed(instr.imm);
        let mem_plan = match instr.op {
            XOp::Add | XOp::Mul | XOp::Mac => VecDeque::new(),
            XOp::Lw => VecDeque::from([MemRequest::read(id, base)]),
            XOp::Sw => VecDeque::from([MemRequest::write(id, base, rs[1])]),
            XOp::Ld2 => VecDeque::from([
                MemRequest::read(id, base),
                MemRequest::read(id, base.wrapping_add(4)),
            ]),
        };
        Self {
            id,
            instr,
            rs,
            committed: false,
            mem_plan,
            mem_outstanding: 0,
            loaded: Vec::with_capacity(instr.op.mem_accesses()),
            committed_value: None,
            ready_at: None,
        }
    }

    fn mem_done(&self) -> bool {
        self.mem_plan.is_empty() && self.mem_outstanding == 0
    }

    fn value(&self) -> u32 {
        let [rs1, rs2, _] = self.rs;
        match self.instr.op {
            XOp::Add => rs1.wrapping_add(rs2),
            XOp::Mul => rs1.wrapping_mul(rs2),
            XOp::Mac => self.committed_value.unwrap_or_default(),
            XOp::Lw => self.loaded.first().copied().unwrap_or_default(),
            XOp::Sw => 0,
            XOp::Ld2 => self.loaded.iter().fold(0, |acc, word| acc.wrapping_add(*word)),
        }
    }
}

/// The reference accelerator.
#[derive(Debug)]
pub struct Accelerator {
    config: AcceleratorConfig,
    /// Accepted, not yet retired or killed; oldest first.
    entries: VecDeque<Entry>,
    acc: u32,
    cycle: u64,
}

impl Accelerator {
    /// Creates an idle accelerator.
    pub fn new(config: &AcceleratorConfig) -> Self {
        Self {
            config: config.clone(),
            entries: VecDeque::with_capacity(config.queue_depth),
            acc: 0,
            cycle: 0,
        }
    }

    /// Accumulator value.
    pub const fn acc(&self) -> u32 {
        self.acc
    }

    /// Number of instructions held.
    pub fn occupancy(&self) -> usize {
        self.entries.len()
    }

    fn entry_mut(&mut self, id: InstrId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Index of the entry whose memory request goes out next.
    ///
    /// Accesses leave in program order: only the oldest entry with accesses
    /// left may present one, and only once it is allowed to.
    fn next_mem_entry(&self) -> Option<usize> {
        let idx = self
            .entries
            .iter()
            .position(|entry| !entry.mem_plan.is_empty())?;
        let entry = &self.entries[idx];
        let front = entry.mem_plan.front()?;
        let allowed = entry.committed || (!front.we && self.config.speculative_loads);
        allowed.then_some(idx)
    }

    /// Index of the oldest entry with a result ready.
    fn next_result_entry(&self) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.committed
                && entry.mem_done()
                && entry.ready_at.is_some_and(|at| self.cycle >= at)
        })
    }
}

impl Coprocessor for Accelerator {
    fn name(&self) -> &str {
        "xcustom"
    }

    fn compressed(&mut self, req: &CompressedRequest) -> CompressedResponse {
        if !self.config.compressed {
            return CompressedResponse::refuse();
        }
        expand::expand(req.instr)
            .map_or_else(CompressedResponse::refuse, CompressedResponse::expand)
    }

    fn issue(&mut self, req: &IssueRequest) -> IssueResponse {
        if self.entries.len() >= self.config.queue_depth {
            trace!(id = %req.id, depth = self.config.queue_depth, "accelerator queue full");
            return IssueResponse::stall();
        }
        let Some(instr) = decode(req.instr) else {
            return IssueResponse::reject();
        };
        self.entries.push_back(Entry::new(req.id, instr, req.rs));
        IssueResponse::accept(instr.op.writes_back(), instr.op.mem_accesses() > 0)
    }

    fn commit(&mut self, commit: &CommitRequest) {
        if commit.kill {
            self.entries.retain(|entry| entry.id != commit.id);
            return;
        }
        let mut acc = self.acc;
        if let Some(entry) = self.entry_mut(commit.id) {
            entry.committed = true;
            if entry.instr.op == XOp::Mac {
                let [rs1, rs2, _] = entry.rs;
                acc = acc.wrapping_add(rs1.wrapping_mul(rs2));
                entry.committed_value = Some(acc);
            }
        }
        if acc != self.acc {
            debug!(id = %commit.id, acc, "accumulator updated");
            self.acc = acc;
        }
    }

    fn mem_request(&self) -> Option<MemRequest> {
        let idx = self.next_mem_entry()?;
        self.entries[idx].mem_plan.front().copied()
    }

    fn mem_request_accepted(&mut self) {
        if let Some(idx) = self.next_mem_entry() {
            let entry = &mut self.entries[idx];
            let _ = entry.mem_plan.pop_front();
            entry.mem_outstanding += 1;
        }
    }

    fn mem_result(&mut self, result: &MemResult) {
        if let Some(entry) = self.entry_mut(result.id) {
            entry.mem_outstanding = entry.mem_outstanding.saturating_sub(1);
            if !result.request.we {
                entry.loaded.push(result.rdata);
            }
        }
    }

    fn result(&self) -> Option<ResultPayload> {
        let entry = &self.entries[self.next_result_entry()?];
        Some(ResultPayload {
            id: entry.id,
            data: entry.value(),
        })
    }

    fn result_accepted(&mut self) {
        if let Some(idx) = self.next_result_entry() {
            let _ = self.entries.remove(idx);
        }
    }

    fn tick(&mut self) {
        self.cycle += 1;
        let (cycle, latency) = (self.cycle, self.config.latency);
        for entry in &mut self.entries {
            if entry.ready_at.is_none() && entry.committed && entry.mem_done() {
                entry.ready_at = Some(cycle.saturating_add(latency));
            }
        }
    }

    fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    fn registers(&self) -> Vec<(&'static str, u32)> {
        vec![("acc", self.acc)]
    }
}
