//! The core's side of the extension interface.

use tracing::{debug, info};

use crate::common::error::SimError;
use crate::core::cpu::{Core, HeldInstr, ScheduledCommit};
use crate::core::xif::host::XifHost;
use crate::core::xif::signals::{
    CommitRequest, CompressedResponse, IssueResponse, MemRequest, MemResponse, Retirement,
};
use crate::core::xif::tracker::{InstrId, OffloadCandidate};
use crate::isa::disasm::disassemble;
use crate::isa::instruction::InstructionBits;
use crate::isa::xcustom::{self, XOp};

/// Registers an offload reads or writes, taken from the fields its format defines.
///
/// Unused positions are x0, which never has a pending writer. Encodings the
/// extension will reject claim nothing.
fn hazard_regs(instr: u32) -> [usize; 3] {
    let Some(x) = xcustom::decode(instr) else {
        return [0; 3];
    };
    match x.op {
        XOp::Add | XOp::Mul | XOp::Mac => [x.rs1, x.rs2, x.rd],
        XOp::Lw | XOp::Ld2 => [x.rs1, 0, x.rd],
        XOp::Sw => [x.rs1, x.rs2, 0],
    }
}

impl XifHost for Core {
    type Error = SimError;

    fn compressed_offer(&mut self) -> Option<u16> {
        match self.held {
            Some(HeldInstr::Parcel { parcel, .. }) => Some(parcel),
            _ => None,
        }
    }

    fn compressed_done(&mut self, response: CompressedResponse) {
        let Some(HeldInstr::Parcel { pc, parcel }) = self.held else {
            return;
        };
        if let Some(instr) = response.expanded() {
            self.held = Some(HeldInstr::Offload {
                pc,
                instr,
                len: 2,
                compressed: true,
            });
        } else {
            self.held = None;
            self.retire_native(pc, u32::from(parcel), 2);
        }
    }

    fn issue_offer(&mut self) -> Option<OffloadCandidate> {
        let Some(HeldInstr::Offload {
            instr, compressed, ..
        }) = self.held
        else {
            return None;
        };
        // Sources and the destination: a later writer must not retire first.
        if self.scoreboard.any_pending(&hazard_regs(instr)) {
            self.stats.hazard_stalls += 1;
            return None;
        }
        let rs = [
            self.regs.read(instr.rs1()),
            self.regs.read(instr.rs2()),
            self.regs.read(instr.rs3()),
        ];
        Some(OffloadCandidate {
            instr,
            rs,
            compressed,
        })
    }

    fn issue_done(&mut self, id: InstrId, response: IssueResponse, cycle: u64) {
        let Some(HeldInstr::Offload { pc, instr, len, .. }) = self.held.take() else {
            return;
        };
        if !response.is_accepted() {
            debug!(pc, instr, "offload rejected, executing natively");
            self.retire_native(pc, instr, len);
            return;
        }
        if response.writeback {
            self.scoreboard.set_producer(instr.rd(), id);
        }
        let kill = self.kill_set.contains(&pc);
        self.commit_queue.push_back(ScheduledCommit {
            id,
            due: cycle.saturating_add(self.commit_latency),
            kill,
            pc,
        });
        self.stats.offloaded += 1;
        self.pc = pc.wrapping_add(len);
        if self.trace {
            info!(pc = format_args!("{pc:#010x}"), %id, kill, "offload {}", disassemble(instr));
        }
    }

    fn commit_offer(&mut self, cycle: u64) -> Option<CommitRequest> {
        let next = self.commit_queue.front().filter(|c| c.due <= cycle).copied()?;
        let _ = self.commit_queue.pop_front();
        if next.kill {
            self.scoreboard.clear_id(next.id);
        }
        Some(CommitRequest {
            id: next.id,
            kill: next.kill,
        })
    }

    fn data_request(&mut self, request: MemRequest, cycle: u64) -> Result<(), SimError> {
        let _ = self.data_port.request(&mut self.memory, &request, cycle)?;
        Ok(())
    }

    fn data_response(&mut self, cycle: u64) -> Result<Option<(InstrId, MemResponse)>, SimError> {
        Ok(self.data_port.response(cycle))
    }

    fn writeback(&mut self, retirement: Retirement) {
        let Some(rd) = retirement.rd else {
            return;
        };
        self.regs.write(rd, retirement.value);
        self.scoreboard.clear_if_match(rd, retirement.id);
        self.stats.writebacks += 1;
        if self.trace {
            info!(
                id = %retirement.id,
                rd,
                value = format_args!("{:#010x}", retirement.value),
                "writeback {}",
                disassemble(retirement.instr)
            );
        }
    }
}
