//! Instruction Disassembler.
//!
//! Converts encodings into mnemonic strings for trace output and CLI
//! reports. Only the custom-0 accelerator instructions and `c.xadd` are
//! spelled out; anything else is shown as a raw word.

use crate::common::constants::is_compressed;
use crate::isa::rvc::expand::is_c_xadd;
use crate::isa::xcustom::{XOp, decode};

/// ABI register names for x0–x31.
const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name for an integer register index.
#[inline]
fn xreg(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Disassembles `instr`.
///
/// A value with a 16-bit encoding in its low bits is treated as a parcel.
///
/// ```
/// use xifsim_core::isa::disasm::disassemble;
/// use xifsim_core::isa::xcustom::xadd;
///
/// assert_eq!(disassemble(xadd(10, 11, 12)), "xadd a0, a1, a2");
/// ```
pub fn disassemble(instr: u32) -> String {
    if is_compressed(instr) {
        let parcel = (instr & 0xFFFF) as u16;
        if is_c_xadd(parcel) {
            let rd = 8 + usize::from((parcel >> 7) & 0x7);
            let rs2 = 8 + usize::from((parcel >> 2) & 0x7);
            return format!("c.xadd {}, {}", xreg(rd), xreg(rs2));
        }
        return format!(".half {parcel:#06x}");
    }
    let Some(x) = decode(instr) else {
        return format!(".word {instr:#010x}");
    };
    let name = x.op.mnemonic();
    match x.op {
        XOp::Add | XOp::Mul | XOp::Mac => {
            format!("{name} {}, {}, {}", xreg(x.rd), xreg(x.rs1), xreg(x.rs2))
        }
        XOp::Lw => format!("{name} {}, {}({})", xreg(x.rd), x.imm, xreg(x.rs1)),
        XOp::Sw => format!("{name} {}, {}({})", xreg(x.rs2), x.imm, xreg(x.rs1)),
        XOp::Ld2 => format!("{name} {}, ({})", xreg(x.rd), xreg(x.rs1)),
    }
}
