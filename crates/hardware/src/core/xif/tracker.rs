//! In-flight instruction tracker.
//!
//! The tracker is a fixed-size slot table mirroring the hardware's in-flight
//! buffer for offloaded instructions. It provides:
//! 1. **Allocation:** Assigns a small integer id (the slot index) to a candidate instruction.
//! 2. **Lookup:** Access to the protocol state of a live id.
//! 3. **Release:** Frees a slot on retirement, rejection or a drained kill.
//!
//! Ids are handed out round-robin so a freed id is not immediately reused.

use std::collections::VecDeque;
use std::fmt;

use crate::common::constants::{RD_SHIFT, REG_MASK};
use crate::common::error::{XifError, XifResult};
use crate::core::xif::signals::MemRequest;

/// Id of an in-flight instruction on the extension interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InstrId(pub u32);

impl InstrId {
    /// Slot index backing this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Protocol state of a tracked instruction.
///
/// Rejected and retired instructions have no state: their slot is free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum XifState {
    /// Allocated and offered; no issue decision yet.
    #[default]
    Decoded,
    /// Accepted by the extension, awaiting commit or kill.
    Accepted,
    /// Committed; owes a result once its memory traffic drains.
    Committed,
    /// Killed; kept only until its accepted memory requests complete.
    Killed,
}

/// Instruction as the core presents it for offload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffloadCandidate {
    /// 32-bit encoding (already expanded if it came from a compressed parcel).
    pub instr: u32,
    /// Source operand values rs1, rs2, rs3.
    pub rs: [u32; 3],
    /// The encoding is the expansion of a compressed parcel.
    pub compressed: bool,
}

impl OffloadCandidate {
    /// Candidate with no source operands.
    pub const fn new(instr: u32) -> Self {
        Self {
            instr,
            rs: [0; 3],
            compressed: false,
        }
    }

    /// Sets the source operand values.
    #[must_use]
    pub const fn with_operands(mut self, rs: [u32; 3]) -> Self {
        self.rs = rs;
        self
    }
}

/// One in-flight instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionRecord {
    /// Id (slot index).
    pub id: InstrId,
    /// Instruction encoding.
    pub instr: u32,
    /// Source operand values.
    pub rs: [u32; 3],
    /// Came from an expanded compressed parcel.
    pub compressed: bool,
    /// Protocol state.
    pub state: XifState,
    /// Extension asked for register writeback at issue.
    pub writeback: bool,
    /// Extension announced memory traffic at issue.
    pub loadstore: bool,
    /// Accepted memory requests still waiting for their response, oldest first.
    pub mem_pending: VecDeque<MemRequest>,
    /// A result is still owed for this instruction.
    pub result_pending: bool,
    /// Result value once produced.
    pub result: Option<u32>,
}

impl InstructionRecord {
    fn new(id: InstrId, candidate: OffloadCandidate) -> Self {
        Self {
            id,
            instr: candidate.instr,
            rs: candidate.rs,
            compressed: candidate.compressed,
            state: XifState::Decoded,
            writeback: false,
            loadstore: false,
            mem_pending: VecDeque::new(),
            result_pending: false,
            result: None,
        }
    }

    /// The extension accepted this instruction at issue.
    pub const fn issue_accepted(&self) -> bool {
        !matches!(self.state, XifState::Decoded)
    }

    /// Commit or kill has been observed.
    pub const fn commit_observed(&self) -> bool {
        matches!(self.state, XifState::Committed | XifState::Killed)
    }

    /// Number of accepted memory requests without a response.
    pub fn mem_pending_count(&self) -> usize {
        self.mem_pending.len()
    }

    /// Destination register field of the encoding.
    pub const fn rd(&self) -> usize {
        ((self.instr >> RD_SHIFT) & REG_MASK) as usize
    }
}

/// Fixed-capacity table of in-flight instructions.
#[derive(Debug)]
pub struct InstructionTracker {
    slots: Vec<Option<InstructionRecord>>,
    /// Slot the next allocation search starts from.
    cursor: usize,
    occupied: usize,
}

impl InstructionTracker {
    /// Creates a tracker with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            cursor: 0,
            occupied: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live records.
    #[inline]
    pub const fn len(&self) -> usize {
        self.occupied
    }

    /// True if no instruction is in flight.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// True if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// Number of free slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.slots.len() - self.occupied
    }

    /// Creates a record for `candidate` in the next free slot.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if every slot is occupied.
    pub fn allocate(&mut self, candidate: OffloadCandidate) -> XifResult<InstrId> {
        let capacity = self.slots.len();
        let idx = (0..capacity)
            .map(|offset| (self.cursor + offset) % capacity)
            .find(|&idx| self.slots[idx].is_none())
            .ok_or(XifError::CapacityExceeded { capacity })?;

        let id = InstrId(idx as u32);
        self.slots[idx] = Some(InstructionRecord::new(id, candidate));
        self.cursor = (idx + 1) % capacity;
        self.occupied += 1;
        Ok(id)
    }

    /// Returns the record for `id`.
    ///
    /// # Errors
    ///
    /// `UnknownId` if `id` is not live.
    pub fn lookup(&self, id: InstrId) -> XifResult<&InstructionRecord> {
        self.get(id).ok_or(XifError::UnknownId(id))
    }

    /// Returns the record for `id` mutably.
    ///
    /// # Errors
    ///
    /// `UnknownId` if `id` is not live.
    pub fn lookup_mut(&mut self, id: InstrId) -> XifResult<&mut InstructionRecord> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(XifError::UnknownId(id))
    }

    /// Returns the record for `id`, if live.
    pub fn get(&self, id: InstrId) -> Option<&InstructionRecord> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// True if `id` is live.
    pub fn contains(&self, id: InstrId) -> bool {
        self.get(id).is_some()
    }

    /// Frees the slot of `id` and returns its final record.
    ///
    /// # Errors
    ///
    /// `UnknownId` if `id` is not live.
    pub fn release(&mut self, id: InstrId) -> XifResult<InstructionRecord> {
        let record = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(XifError::UnknownId(id))?;
        self.occupied -= 1;
        Ok(record)
    }

    /// Iterates over live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &InstructionRecord> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }
}
