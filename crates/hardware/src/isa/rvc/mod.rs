//! Compressed parcels (16-bit encodings).
//!
//! The core's own RV32C decoder is not modeled: parcels in standard slots
//! are executed natively, parcels in reserved slots are offered to the
//! extension on the compressed channel.
//!
//! # Structure
//!
//! - `constants`: Quadrant and funct3 definitions.
//! - `expand`: `c.xadd` encoding and expansion.

/// Compressed instruction quadrant and opcode constants.
pub mod constants;

/// `c.xadd` encoding and expansion.
pub mod expand;

use self::constants::{QUADRANT_0, QUADRANT_MASK, q0};

/// funct3 field of a compressed parcel (bits 13-15).
#[inline]
pub const fn funct3(parcel: u16) -> u16 {
    (parcel >> 13) & 0x7
}

/// Returns true if `parcel` sits in an encoding slot RV32C leaves reserved.
pub const fn is_reserved(parcel: u16) -> bool {
    parcel & QUADRANT_MASK == QUADRANT_0 && funct3(parcel) == q0::RESERVED
}
