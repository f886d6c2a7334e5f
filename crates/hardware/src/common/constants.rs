//! Global Subsystem Constants.
//!
//! This module defines the constants shared across the simulator. It includes:
//! 1. **Instruction Constants:** Opcode masks and field shifts for the RV32 encodings the core inspects.
//! 2. **Extension Constants:** Custom opcode slots and the in-flight id space of the extension interface.
//! 3. **Interrupt Constants:** Fixed bit assignment of the 32-bit interrupt input vector.
//! 4. **Bus Constants:** Byte-enable patterns used on the OBI ports.

/// Bit mask for extracting the opcode field from a 32-bit instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Mask for any 5-bit register index field.
pub const REG_MASK: u32 = 0x1F;

/// Bit position of the destination register (rd) field.
pub const RD_SHIFT: u32 = 7;

/// Bit position of the funct3 field.
pub const FUNCT3_SHIFT: u32 = 12;

/// Mask for the funct3 field after shifting.
pub const FUNCT3_MASK: u32 = 0x7;

/// Bit position of the first source register (rs1) field.
pub const RS1_SHIFT: u32 = 15;

/// Bit position of the second source register (rs2) field.
pub const RS2_SHIFT: u32 = 20;

/// Bit position of the third source register (rs3) field (R4-type).
pub const RS3_SHIFT: u32 = 27;

/// Bit position of the funct7 field.
pub const FUNCT7_SHIFT: u32 = 25;

/// Mask for the funct7 field after shifting.
pub const FUNCT7_MASK: u32 = 0x7F;

/// Low two bits of every 32-bit instruction; any other value marks a 16-bit parcel.
pub const UNCOMPRESSED_LOW_BITS: u32 = 0b11;

/// Size of a compressed (16-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_16: u32 = 2;

/// Size of a standard (32-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_32: u32 = 4;

/// `custom-0` major opcode.
pub const OPCODE_CUSTOM_0: u32 = 0b000_1011;

/// `custom-1` major opcode.
pub const OPCODE_CUSTOM_1: u32 = 0b010_1011;

/// `custom-2` major opcode.
pub const OPCODE_CUSTOM_2: u32 = 0b101_1011;

/// `custom-3` major opcode.
pub const OPCODE_CUSTOM_3: u32 = 0b111_1011;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Largest in-flight instruction table the 8-bit xif id can address.
pub const MAX_IN_FLIGHT: usize = 256;

/// Software interrupt bit of the interrupt input vector.
pub const IRQ_SOFTWARE_BIT: u32 = 3;

/// Timer interrupt bit of the interrupt input vector.
pub const IRQ_TIMER_BIT: u32 = 7;

/// External interrupt bit of the interrupt input vector.
pub const IRQ_EXTERNAL_BIT: u32 = 11;

/// First bit of the 16 fast interrupt lines (bits 16..=31).
pub const IRQ_FAST_SHIFT: u32 = 16;

/// Number of fast interrupt lines.
pub const IRQ_FAST_LINES: u32 = 16;

/// Bits of the interrupt vector that are wired to a source.
pub const IRQ_WIRED_MASK: u32 =
    (1 << IRQ_SOFTWARE_BIT) | (1 << IRQ_TIMER_BIT) | (1 << IRQ_EXTERNAL_BIT) | 0xFFFF_0000;

/// Byte enables for a full 32-bit word access.
pub const BE_WORD: u8 = 0b1111;

/// Returns true if `instr` holds a 16-bit compressed parcel in its low half.
#[inline]
pub const fn is_compressed(instr: u32) -> bool {
    instr & UNCOMPRESSED_LOW_BITS != UNCOMPRESSED_LOW_BITS
}

/// Returns true if `opcode` is one of the four custom major opcodes.
#[inline]
pub const fn is_custom_opcode(opcode: u32) -> bool {
    matches!(
        opcode,
        OPCODE_CUSTOM_0 | OPCODE_CUSTOM_1 | OPCODE_CUSTOM_2 | OPCODE_CUSTOM_3
    )
}
