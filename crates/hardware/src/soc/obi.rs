//! OBI (open bus interface) ports.
//!
//! This module models the two memory ports of the subsystem. It provides:
//! 1. **Transactions:** `ObiRequest` and `ObiResponse` (request/grant/response).
//! 2. **Instruction port:** Read-only word fetches; the write-side outputs are constant stubs.
//! 3. **Data port:** Granted accesses with a fixed response latency, answered in order.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::constants::BE_WORD;
use crate::common::error::SimError;
use crate::core::xif::signals::{MemRequest, MemResponse};
use crate::core::xif::tracker::InstrId;
use crate::soc::memory::Memory;

/// OBI request phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObiRequest {
    /// Byte address.
    pub addr: u32,
    /// Write enable.
    pub we: bool,
    /// Byte enables.
    pub be: u8,
    /// Write data.
    pub wdata: u32,
}

impl From<&MemRequest> for ObiRequest {
    fn from(req: &MemRequest) -> Self {
        Self {
            addr: req.addr,
            we: req.we,
            be: req.be,
            wdata: req.wdata,
        }
    }
}

/// OBI response phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObiResponse {
    /// Read data; zero for writes and for a grant without response.
    pub rdata: u32,
    /// The request was granted.
    pub gnt: bool,
    /// `rdata` is valid this cycle.
    pub rvalid: bool,
}

/// Instruction fetch port.
#[derive(Clone, Debug, Default)]
pub struct InstrPort {
    fetches: u64,
}

impl InstrPort {
    /// Write enable output. The port never writes.
    pub const fn we() -> bool {
        false
    }

    /// Write data output. Tied to zero.
    pub const fn wdata() -> u32 {
        0
    }

    /// Byte enable output. Always a full word.
    pub const fn be() -> u8 {
        BE_WORD
    }

    /// Request presented for a fetch at `addr`.
    pub const fn request(addr: u32) -> ObiRequest {
        ObiRequest {
            addr,
            we: Self::we(),
            be: Self::be(),
            wdata: Self::wdata(),
        }
    }

    /// Fetches the word at `addr`; granted and answered in the same cycle.
    ///
    /// # Errors
    ///
    /// `MisalignedFetch` if `addr` is not word aligned, `BusFault` if it is unmapped.
    pub fn fetch(&mut self, memory: &Memory, addr: u32) -> Result<ObiResponse, SimError> {
        let req = Self::request(addr);
        if req.addr % 4 != 0 {
            return Err(SimError::MisalignedFetch(req.addr));
        }
        let rdata = memory.read_word(req.addr)?;
        self.fetches += 1;
        Ok(ObiResponse {
            rdata,
            gnt: true,
            rvalid: true,
        })
    }

    /// Words fetched so far.
    pub const fn fetches(&self) -> u64 {
        self.fetches
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingAccess {
    id: InstrId,
    due: u64,
    response: MemResponse,
}

/// Data port: performs granted accesses and returns their responses after `latency` cycles.
#[derive(Clone, Debug)]
pub struct DataPort {
    latency: u64,
    pending: VecDeque<PendingAccess>,
}

impl DataPort {
    /// Creates an idle port.
    pub const fn new(latency: u64) -> Self {
        Self {
            latency,
            pending: VecDeque::new(),
        }
    }

    /// Grants `req` on `cycle`, performing the access against `memory`.
    ///
    /// # Errors
    ///
    /// `BusFault` if the word is misaligned or unmapped.
    pub fn request(
        &mut self,
        memory: &mut Memory,
        req: &MemRequest,
        cycle: u64,
    ) -> Result<ObiResponse, SimError> {
        let obi = ObiRequest::from(req);
        let response = if obi.we {
            memory.write_word(obi.addr, obi.wdata, obi.be)?;
            MemResponse::WriteAck
        } else {
            MemResponse::Read(memory.read_word(obi.addr)?)
        };
        trace!(cycle, id = %req.id, addr = obi.addr, we = obi.we, "data port grant");
        self.pending.push_back(PendingAccess {
            id: req.id,
            due: cycle.saturating_add(self.latency),
            response,
        });
        Ok(ObiResponse {
            rdata: 0,
            gnt: true,
            rvalid: false,
        })
    }

    /// Response due on `cycle`, oldest grant first; at most one per cycle.
    pub fn response(&mut self, cycle: u64) -> Option<(InstrId, MemResponse)> {
        let access = self.pending.front().filter(|access| access.due <= cycle)?;
        let out = (access.id, access.response);
        let _ = self.pending.pop_front();
        Some(out)
    }

    /// Granted accesses still waiting for their response.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// True if no response is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
