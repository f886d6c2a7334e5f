//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for the RV32 fields the core and the accelerator
//! look at, and encoders for the R, I and S formats used to build programs.

use crate::common::constants::{
    FUNCT3_MASK, FUNCT3_SHIFT, FUNCT7_MASK, FUNCT7_SHIFT, OPCODE_MASK, RD_SHIFT, REG_MASK,
    RS1_SHIFT, RS2_SHIFT, RS3_SHIFT,
};

/// Bit shift of the I-type immediate (bits 20-31).
const I_IMM_SHIFT: u32 = 20;

/// Bit mask of the S-type immediate low field (imm[4:0], bits 7-11).
const S_IMM_LOW_MASK: u32 = 0x1F;

/// Bit shift of the S-type immediate high field (imm[11:5], bits 25-31).
const S_IMM_HIGH_SHIFT: u32 = 25;

/// Mask of a 12-bit immediate.
const IMM12_MASK: u32 = 0xFFF;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the third source register field (bits 27-31, R4-type).
    fn rs3(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Sign-extended I-type immediate.
    fn imm_i(&self) -> i32;

    /// Sign-extended S-type immediate.
    ///
    /// The immediate is split across two non-contiguous fields and
    /// reassembled here.
    fn imm_s(&self) -> i32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> RS2_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs3(&self) -> usize {
        ((self >> RS3_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> FUNCT3_SHIFT) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> FUNCT7_SHIFT) & FUNCT7_MASK
    }

    #[inline(always)]
    fn imm_i(&self) -> i32 {
        (*self as i32) >> I_IMM_SHIFT
    }

    #[inline(always)]
    fn imm_s(&self) -> i32 {
        let high = ((*self as i32) >> S_IMM_HIGH_SHIFT) << 5;
        let low = ((self >> RD_SHIFT) & S_IMM_LOW_MASK) as i32;
        high | low
    }
}

/// Encodes an R-type instruction.
pub const fn encode_r(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    ((funct7 & FUNCT7_MASK) << FUNCT7_SHIFT)
        | ((rs2 & REG_MASK) << RS2_SHIFT)
        | ((rs1 & REG_MASK) << RS1_SHIFT)
        | ((funct3 & FUNCT3_MASK) << FUNCT3_SHIFT)
        | ((rd & REG_MASK) << RD_SHIFT)
        | (opcode & OPCODE_MASK)
}

/// Encodes an I-type instruction; `imm` is truncated to 12 bits.
pub const fn encode_i(imm: i32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    (((imm as u32) & IMM12_MASK) << I_IMM_SHIFT)
        | ((rs1 & REG_MASK) << RS1_SHIFT)
        | ((funct3 & FUNCT3_MASK) << FUNCT3_SHIFT)
        | ((rd & REG_MASK) << RD_SHIFT)
        | (opcode & OPCODE_MASK)
}

/// Encodes an S-type instruction; `imm` is truncated to 12 bits.
pub const fn encode_s(imm: i32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    let imm = (imm as u32) & IMM12_MASK;
    ((imm >> 5) << S_IMM_HIGH_SHIFT)
        | ((rs2 & REG_MASK) << RS2_SHIFT)
        | ((rs1 & REG_MASK) << RS1_SHIFT)
        | ((funct3 & FUNCT3_MASK) << FUNCT3_SHIFT)
        | ((imm & S_IMM_LOW_MASK) << RD_SHIFT)
        | (opcode & OPCODE_MASK)
}
