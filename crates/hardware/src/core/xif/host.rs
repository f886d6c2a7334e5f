//! Core-side interface.
//!
//! `XifHost` is the core half of the extension interface as seen by the
//! arbiter's per-step evaluation: it presents compressed and issue
//! candidates, decides commit/kill, owns the data port, and receives
//! writebacks. The arbiter calls it in the fixed stage order.

use crate::common::error::XifError;
use crate::core::xif::signals::{
    CommitRequest, CompressedResponse, IssueResponse, MemRequest, MemResponse, Retirement,
};
use crate::core::xif::tracker::{InstrId, OffloadCandidate};

/// The core side of the extension interface.
pub trait XifHost {
    /// Error type of the host's own ports; protocol faults convert into it.
    type Error: From<XifError>;

    /// 16-bit parcel waiting for an expansion decision.
    fn compressed_offer(&mut self) -> Option<u16>;

    /// Completed compressed handshake.
    fn compressed_done(&mut self, response: CompressedResponse);

    /// Instruction to offer on the issue channel.
    ///
    /// Only asked when no earlier candidate is still waiting for `ready`.
    fn issue_offer(&mut self) -> Option<OffloadCandidate>;

    /// Completed issue handshake for the candidate allocated as `id`.
    fn issue_done(&mut self, id: InstrId, response: IssueResponse, cycle: u64);

    /// Commit or kill to signal this cycle.
    fn commit_offer(&mut self, cycle: u64) -> Option<CommitRequest>;

    /// Forwards a granted memory request to the data port.
    ///
    /// # Errors
    ///
    /// Port-specific failures such as a bus fault.
    fn data_request(&mut self, request: MemRequest, cycle: u64) -> Result<(), Self::Error>;

    /// Data port response available this cycle.
    ///
    /// # Errors
    ///
    /// Port-specific failures such as a bus fault.
    fn data_response(&mut self, cycle: u64) -> Result<Option<(InstrId, MemResponse)>, Self::Error>;

    /// Accepted result of a retired instruction.
    fn writeback(&mut self, retirement: Retirement);
}
