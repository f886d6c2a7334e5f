//! Instruction fetch and decode.
//!
//! One instruction enters per cycle. The core decodes just enough to route
//! it: standard encodings retire natively, reserved compressed parcels go
//! to the compressed channel, custom-opcode instructions go to issue. A
//! held instruction blocks fetch until the extension interface lets it go.

use tracing::{debug, info};

use crate::common::constants::{
    INSTRUCTION_SIZE_16, INSTRUCTION_SIZE_32, is_compressed, is_custom_opcode,
};
use crate::common::error::SimError;
use crate::core::cpu::{Core, HeldInstr};
use crate::isa::disasm::disassemble;
use crate::isa::instruction::InstructionBits;
use crate::isa::rvc;

/// Offset of the upper parcel inside a word.
const UPPER_PARCEL: u32 = 2;

impl Core {
    /// Fetches and routes the instruction at `pc`, unless one is already held.
    ///
    /// # Errors
    ///
    /// `MisalignedFetch` or `BusFault` from the instruction port.
    pub fn fetch(&mut self) -> Result<(), SimError> {
        if self.held.is_some() || self.pc >= self.program_end() {
            return Ok(());
        }
        let pc = self.pc;
        let (raw, len) = self.fetch_at(pc)?;
        if len == INSTRUCTION_SIZE_16 {
            let parcel = (raw & 0xFFFF) as u16;
            if rvc::is_reserved(parcel) {
                debug!(pc, parcel, "parcel held for the compressed channel");
                self.held = Some(HeldInstr::Parcel { pc, parcel });
            } else {
                self.retire_native(pc, raw, len);
            }
        } else if is_custom_opcode(raw.opcode()) {
            debug!(pc, instr = raw, "instruction held for issue");
            self.held = Some(HeldInstr::Offload {
                pc,
                instr: raw,
                len,
                compressed: false,
            });
        } else {
            self.retire_native(pc, raw, len);
        }
        Ok(())
    }

    /// Reads the instruction at `pc` and its length in bytes.
    ///
    /// A 32-bit instruction at a half-word offset spans two fetches.
    fn fetch_at(&mut self, pc: u32) -> Result<(u32, u32), SimError> {
        let aligned = pc & !0x3;
        let word = self.instr_port.fetch(&self.memory, aligned)?.rdata;
        if pc & UPPER_PARCEL == 0 {
            let low = word & 0xFFFF;
            return Ok(if is_compressed(low) {
                (low, INSTRUCTION_SIZE_16)
            } else {
                (word, INSTRUCTION_SIZE_32)
            });
        }
        let upper = word >> 16;
        if is_compressed(upper) {
            return Ok((upper, INSTRUCTION_SIZE_16));
        }
        let next = self
            .instr_port
            .fetch(&self.memory, aligned.wrapping_add(INSTRUCTION_SIZE_32))?
            .rdata;
        Ok((upper | (next << 16), INSTRUCTION_SIZE_32))
    }

    /// Executes `raw` natively: counted and stepped over.
    pub(crate) fn retire_native(&mut self, pc: u32, raw: u32, len: u32) {
        self.stats.native_instructions += 1;
        self.pc = pc.wrapping_add(len);
        if self.trace {
            info!(pc = format_args!("{pc:#010x}"), "native {}", disassemble(raw));
        }
    }
}
