//! Core Model.
//!
//! This module defines the `Core`, the host side of the extension interface.
//! It coordinates the following:
//! 1. **Fetch:** Reads the program through the instruction port, 16-bit parcels and
//!    32-bit instructions alike (including ones that straddle a word boundary).
//! 2. **Decode:** Standard encodings run natively and are only counted; reserved
//!    compressed parcels and custom-opcode instructions are offloaded.
//! 3. **Hazards:** A scoreboard keyed by xif id holds back an offload whose
//!    registers are still owed by an earlier one.
//! 4. **Commit:** Every accepted instruction is committed `commit_latency` cycles
//!    later, or killed if its address is in the kill set.
//! 5. **Data port and writeback:** Forwards the extension's memory traffic and
//!    writes retired results to the register file.

/// Instruction fetch and decode.
pub mod fetch;

/// `XifHost` implementation.
pub mod host;

/// Register dependency scoreboard.
pub mod scoreboard;

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::common::RegisterFile;
use crate::config::Config;
use crate::core::xif::tracker::InstrId;
use crate::soc::memory::Memory;
use crate::soc::obi::{DataPort, InstrPort};

use self::scoreboard::Scoreboard;

/// Instruction held between fetch and the extension interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldInstr {
    /// Reserved 16-bit parcel waiting for the compressed channel.
    Parcel {
        /// Address of the parcel.
        pc: u32,
        /// Raw encoding.
        parcel: u16,
    },
    /// Instruction waiting for the issue channel.
    Offload {
        /// Address of the instruction.
        pc: u32,
        /// 32-bit encoding (expanded if it came from a parcel).
        instr: u32,
        /// Bytes the pc advances by once it leaves.
        len: u32,
        /// Expanded from a compressed parcel.
        compressed: bool,
    },
}

/// Commit decision queued at issue acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledCommit {
    /// Instruction to commit or kill.
    pub id: InstrId,
    /// First cycle the commit may be signalled.
    pub due: u64,
    /// Kill instead of commit.
    pub kill: bool,
    /// Address of the instruction.
    pub pc: u32,
}

/// Counters kept by the core.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CoreStats {
    /// Instructions executed natively (standard, refused or rejected).
    pub native_instructions: u64,
    /// Instructions handed to the extension.
    pub offloaded: u64,
    /// Cycles an offload waited on a register hazard.
    pub hazard_stalls: u64,
    /// Register writebacks.
    pub writebacks: u64,
}

/// The CPU core.
#[derive(Debug)]
pub struct Core {
    /// Program counter of the next fetch.
    pub pc: u32,
    /// Integer registers.
    pub regs: RegisterFile,
    /// Pending register writers.
    pub scoreboard: Scoreboard,
    /// Memory behind both ports.
    pub memory: Memory,
    /// Instruction fetch port.
    pub instr_port: InstrPort,
    /// Data port.
    pub data_port: DataPort,
    /// Instruction waiting on the extension interface.
    pub held: Option<HeldInstr>,
    /// Commits in program order.
    pub commit_queue: VecDeque<ScheduledCommit>,
    /// Counters.
    pub stats: CoreStats,
    /// Fetching stops here.
    program_end: u32,
    /// Addresses whose offloaded instruction is killed at commit.
    kill_set: BTreeSet<u32>,
    commit_latency: u64,
    trace: bool,
}

impl Core {
    /// Creates a core that boots at `config.core.boot_addr` with `memory` attached.
    ///
    /// The program is empty until `set_program_end` is called.
    pub fn new(config: &Config, memory: Memory) -> Self {
        let boot = config.core.boot_addr;
        Self {
            pc: boot,
            regs: RegisterFile::new(),
            scoreboard: Scoreboard::new(),
            memory,
            instr_port: InstrPort::default(),
            data_port: DataPort::new(config.memory.latency),
            held: None,
            commit_queue: VecDeque::new(),
            stats: CoreStats::default(),
            program_end: boot,
            kill_set: BTreeSet::new(),
            commit_latency: config.core.commit_latency,
            trace: config.general.trace_instructions,
        }
    }

    /// Sets the address one past the last program byte.
    pub const fn set_program_end(&mut self, end: u32) {
        self.program_end = end;
    }

    /// Address one past the last program byte.
    pub const fn program_end(&self) -> u32 {
        self.program_end
    }

    /// Marks the instruction at `pc` to be killed at commit.
    pub fn kill_at(&mut self, pc: u32) {
        let _ = self.kill_set.insert(pc);
    }

    /// True once the program has been fetched and nothing is outstanding.
    ///
    /// Drives the sleep output together with the arbiter.
    pub fn is_idle(&self) -> bool {
        self.pc >= self.program_end
            && self.held.is_none()
            && self.commit_queue.is_empty()
            && self.data_port.is_idle()
    }
}
