//! RISC-V Compressed (C) Extension Constants.
//!
//! Compressed instructions are divided into three quadrants (0, 1, 2) based
//! on the lowest 2 bits of the parcel.

/// Mask of the quadrant bits.
pub const QUADRANT_MASK: u16 = 0b11;
/// Quadrant 0 (bits 1:0 = 00).
pub const QUADRANT_0: u16 = 0b00;
/// Quadrant 1 (bits 1:0 = 01).
pub const QUADRANT_1: u16 = 0b01;
/// Quadrant 2 (bits 1:0 = 10).
pub const QUADRANT_2: u16 = 0b10;

/// Quadrant 0 funct3 slots.
pub mod q0 {
    /// Compressed Add Immediate, scaled by 4, to Stack Pointer (C.ADDI4SPN).
    pub const C_ADDI4SPN: u16 = 0b000;
    /// Compressed Load Word (C.LW).
    pub const C_LW: u16 = 0b010;
    /// Reserved in RV32C; used for `c.xadd`.
    pub const RESERVED: u16 = 0b100;
    /// Compressed Store Word (C.SW).
    pub const C_SW: u16 = 0b110;
}

/// Offset added to a 3-bit compressed register field (x8-x15).
pub const CREG_BASE: u32 = 8;
