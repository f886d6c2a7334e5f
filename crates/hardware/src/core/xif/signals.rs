//! Extension interface channel payloads.
//!
//! Each xif channel is a valid/ready pair carrying one of the structures
//! below. A payload that exists is `valid`; the response types carry the
//! `ready`/`accept` half of the handshake.
//!
//! Core → extension: compressed, issue, commit, memory result.
//! Extension → core: memory request, result.

use std::fmt;

use crate::common::constants::BE_WORD;
use crate::core::xif::tracker::InstrId;

/// Extension-interface channels, in the order the arbiter evaluates them each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Offer of a 16-bit instruction for expansion.
    Compressed,
    /// Offer of a 32-bit instruction for acceptance.
    Issue,
    /// Commit or kill of an issued instruction.
    Commit,
    /// Load/store request from the extension to the core's data port.
    MemRequest,
    /// Data port response forwarded to the extension.
    MemResult,
    /// Computed value returned by the extension for writeback.
    Result,
}

impl Stage {
    /// Per-step evaluation order.
    pub const ORDER: [Self; 6] = [
        Self::Compressed,
        Self::Issue,
        Self::Commit,
        Self::MemRequest,
        Self::MemResult,
        Self::Result,
    ];

    /// Short lowercase name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compressed => "compressed",
            Self::Issue => "issue",
            Self::Commit => "commit",
            Self::MemRequest => "mem",
            Self::MemResult => "mem_result",
            Self::Result => "result",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compressed channel request: a 16-bit parcel the core could not decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressedRequest {
    /// Raw 16-bit encoding.
    pub instr: u16,
}

/// Compressed channel response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompressedResponse {
    /// Handshake completed this step.
    pub ready: bool,
    /// Extension expanded the instruction.
    pub accept: bool,
    /// Expanded 32-bit encoding; meaningful only when `accept` is set.
    pub instr: u32,
}

impl CompressedResponse {
    /// Not ready; the core re-offers next step.
    pub const fn stall() -> Self {
        Self {
            ready: false,
            accept: false,
            instr: 0,
        }
    }

    /// Ready but not expanded; the core's own decoder handles the parcel.
    pub const fn refuse() -> Self {
        Self {
            ready: true,
            accept: false,
            instr: 0,
        }
    }

    /// Ready and expanded to `instr`.
    pub const fn expand(instr: u32) -> Self {
        Self {
            ready: true,
            accept: true,
            instr,
        }
    }

    /// Returns the expansion if the handshake completed with `accept`.
    pub const fn expanded(&self) -> Option<u32> {
        if self.ready && self.accept {
            Some(self.instr)
        } else {
            None
        }
    }
}

/// Issue channel request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueRequest {
    /// Id the instruction was allocated under.
    pub id: InstrId,
    /// 32-bit (possibly expanded) encoding.
    pub instr: u32,
    /// Source operand values rs1, rs2, rs3 sampled from the register file.
    pub rs: [u32; 3],
    /// The instruction came from an expanded compressed parcel.
    pub compressed: bool,
}

/// Issue channel response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IssueResponse {
    /// Handshake completed this step; `accept` is latched.
    pub ready: bool,
    /// Extension takes ownership of the instruction.
    pub accept: bool,
    /// The result will be written back to `rd`.
    pub writeback: bool,
    /// The instruction will issue memory requests.
    pub loadstore: bool,
}

impl IssueResponse {
    /// Not ready; the same id is re-offered next step.
    pub const fn stall() -> Self {
        Self {
            ready: false,
            accept: false,
            writeback: false,
            loadstore: false,
        }
    }

    /// Ready and rejected; the core treats the instruction as its own.
    pub const fn reject() -> Self {
        Self {
            ready: true,
            accept: false,
            writeback: false,
            loadstore: false,
        }
    }

    /// Ready and accepted.
    pub const fn accept(writeback: bool, loadstore: bool) -> Self {
        Self {
            ready: true,
            accept: true,
            writeback,
            loadstore,
        }
    }

    /// Ready and accepted.
    pub const fn is_accepted(&self) -> bool {
        self.ready && self.accept
    }
}

/// Commit channel transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    /// Instruction being committed or killed.
    pub id: InstrId,
    /// Discard the instruction instead of committing it.
    pub kill: bool,
}

/// Memory request presented by the extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRequest {
    /// Instruction the access belongs to.
    pub id: InstrId,
    /// Byte address.
    pub addr: u32,
    /// Write enable.
    pub we: bool,
    /// Write data; zero for reads.
    pub wdata: u32,
    /// Byte enables.
    pub be: u8,
}

impl MemRequest {
    /// Word read at `addr`.
    pub const fn read(id: InstrId, addr: u32) -> Self {
        Self {
            id,
            addr,
            we: false,
            wdata: 0,
            be: BE_WORD,
        }
    }

    /// Word write of `wdata` at `addr`.
    pub const fn write(id: InstrId, addr: u32, wdata: u32) -> Self {
        Self {
            id,
            addr,
            we: true,
            wdata,
            be: BE_WORD,
        }
    }
}

/// Completion of a memory request as seen by the core's data port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemResponse {
    /// Read data for a load.
    Read(u32),
    /// Acknowledge of a store.
    WriteAck,
}

impl MemResponse {
    /// Read data, or zero for a store acknowledge.
    pub const fn rdata(self) -> u32 {
        match self {
            Self::Read(data) => data,
            Self::WriteAck => 0,
        }
    }

    /// True for a store acknowledge.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::WriteAck)
    }
}

/// Memory result channel transaction, delivered to the extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemResult {
    /// Instruction the access belonged to.
    pub id: InstrId,
    /// Read data, zero for stores.
    pub rdata: u32,
    /// The request it answers.
    pub request: MemRequest,
}

/// Result presented by the extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultPayload {
    /// Instruction the value belongs to.
    pub id: InstrId,
    /// Computed value.
    pub data: u32,
}

/// Outcome of an extension → core handshake with backpressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handshake {
    /// The core took the transaction.
    Accepted,
    /// The core was not ready; the extension must hold the payload and retry.
    Stalled,
}

impl Handshake {
    /// True if the transaction was taken.
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A retired instruction handed to the core for writeback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retirement {
    /// Retired instruction id (its slot is already free).
    pub id: InstrId,
    /// Instruction encoding.
    pub instr: u32,
    /// Result value.
    pub value: u32,
    /// Destination register if the extension asked for writeback.
    pub rd: Option<usize>,
}

/// Outcome of the result handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultHandshake {
    /// Accepted; the instruction retired.
    Retired(Retirement),
    /// The core was not ready; the extension must retry.
    Stalled,
}

impl ResultHandshake {
    /// True if the result was accepted.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Retired(_))
    }
}
