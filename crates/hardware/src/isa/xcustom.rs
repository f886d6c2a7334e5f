//! Custom-0 accelerator instructions.
//!
//! The reference accelerator claims the `custom-0` major opcode. funct3
//! selects the operation:
//!
//! | funct3 | mnemonic | format | effect                         |
//! |--------|----------|--------|--------------------------------|
//! | 0      | `xadd`   | R      | rd = rs1 + rs2                 |
//! | 1      | `xmul`   | R      | rd = rs1 * rs2                 |
//! | 2      | `xmac`   | R      | acc += rs1 * rs2; rd = acc     |
//! | 3      | `xlw`    | I      | rd = mem[rs1 + imm]            |
//! | 4      | `xsw`    | S      | mem[rs1 + imm] = rs2           |
//! | 5      | `xld2`   | R      | rd = mem[rs1] + mem[rs1 + 4]   |
//!
//! R-format operations require funct7 = 0. Everything else under
//! `custom-0` is rejected at issue.

use crate::common::constants::OPCODE_CUSTOM_0;
use crate::isa::instruction::{InstructionBits, encode_i, encode_r, encode_s};

/// funct3 values of the custom-0 operations.
pub mod funct3 {
    /// Add.
    pub const XADD: u32 = 0b000;
    /// Multiply, low 32 bits.
    pub const XMUL: u32 = 0b001;
    /// Multiply-accumulate into the accelerator's accumulator.
    pub const XMAC: u32 = 0b010;
    /// Load word.
    pub const XLW: u32 = 0b011;
    /// Store word.
    pub const XSW: u32 = 0b100;
    /// Load and add two consecutive words.
    pub const XLD2: u32 = 0b101;
}

/// Custom-0 operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XOp {
    /// `xadd`
    Add,
    /// `xmul`
    Mul,
    /// `xmac`
    Mac,
    /// `xlw`
    Lw,
    /// `xsw`
    Sw,
    /// `xld2`
    Ld2,
}

impl XOp {
    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "xadd",
            Self::Mul => "xmul",
            Self::Mac => "xmac",
            Self::Lw => "xlw",
            Self::Sw => "xsw",
            Self::Ld2 => "xld2",
        }
    }

    /// The result goes to `rd`.
    pub const fn writes_back(self) -> bool {
        !matches!(self, Self::Sw)
    }

    /// Number of memory accesses the operation performs.
    pub const fn mem_accesses(self) -> usize {
        match self {
            Self::Add | Self::Mul | Self::Mac => 0,
            Self::Lw | Self::Sw => 1,
            Self::Ld2 => 2,
        }
    }
}

/// A decoded custom-0 instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XInstr {
    /// Operation.
    pub op: XOp,
    /// Destination register.
    pub rd: usize,
    /// First source register.
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
    /// Sign-extended immediate (I or S format), zero for R format.
    pub imm: i32,
}

/// Decodes `instr`, or returns `None` if it is not a valid custom-0 instruction.
pub fn decode(instr: u32) -> Option<XInstr> {
    if instr.opcode() != OPCODE_CUSTOM_0 {
        return None;
    }
    let r_type = |op| {
        (instr.funct7() == 0).then(|| XInstr {
            op,
            rd: instr.rd(),
            rs1: instr.rs1(),
            rs2: instr.rs2(),
            imm: 0,
        })
    };
    match instr.funct3() {
        funct3::XADD => r_type(XOp::Add),
        funct3::XMUL => r_type(XOp::Mul),
        funct3::XMAC => r_type(XOp::Mac),
        funct3::XLD2 => r_type(XOp::Ld2),
        funct3::XLW => Some(XInstr {
            op: XOp::Lw,
            rd: instr.rd(),
            rs1: instr.rs1(),
            rs2: 0,
            imm: instr.imm_i(),
        }),
        funct3::XSW => Some(XInstr {
            op: XOp::Sw,
            rd: 0,
            rs1: instr.rs1(),
            rs2: instr.rs2(),
            imm: instr.imm_s(),
        }),
        _ => None,
    }
}

/// `xadd rd, rs1, rs2`
pub const fn xadd(rd: u32, rs1: u32, rs2: u32) -> u32 {
    encode_r(0, rs2, rs1, funct3::XADD, rd, OPCODE_CUSTOM_0)
}

/// `xmul rd, rs1, rs2`
pub const fn xmul(rd: u32, rs1: u32, rs2: u32) -> u32 {
    encode_r(0, rs2, rs1, funct3::XMUL, rd, OPCODE_CUSTOM_0)
}

/// `xmac rd, rs1, rs2`
pub const fn xmac(rd: u32, rs1: u32, rs2: u32) -> u32 {
    encode_r(0, rs2, rs1, funct3::XMAC, rd, OPCODE_CUSTOM_0)
}

/// `xlw rd, imm(rs1)`
pub const fn xlw(rd: u32, rs1: u32, imm: i32) -> u32 {
    encode_i(imm, rs1, funct3::XLW, rd, OPCODE_CUSTOM_0)
}

/// `xsw rs2, imm(rs1)`
pub const fn xsw(rs2: u32, rs1: u32, imm: i32) -> u32 {
    encode_s(imm, rs2, rs1, funct3::XSW, OPCODE_CUSTOM_0)
}

/// `xld2 rd, (rs1)`
pub const fn xld2(rd: u32, rs1: u32) -> u32 {
    encode_r(0, 0, rs1, funct3::XLD2, rd, OPCODE_CUSTOM_0)
}
