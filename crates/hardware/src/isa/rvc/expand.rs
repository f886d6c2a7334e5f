//! `c.xadd` Expansion.
//!
//! `c.xadd rd', rs2'` lives in the reserved quadrant-0 slot (funct3 `100`):
//!
//! ```text
//! 15    13 12  10 9   7 6   5 4   2 1  0
//! [ 100  ][ 000 ][ rd' ][ 00 ][ rs2'][ 00 ]
//! ```
//!
//! and expands to `xadd rd', rd', rs2'`.

use super::constants::{CREG_BASE, QUADRANT_0, QUADRANT_MASK, q0};
use super::funct3;
use crate::common::constants::OPCODE_CUSTOM_0;
use crate::isa::instruction::encode_r;
use crate::isa::xcustom::funct3 as x_f3;

/// Bits of the `c.xadd` parcel that must be zero (12:10 and 6:5).
const C_XADD_ZERO_MASK: u16 = 0b0001_1100_0110_0000;

/// Returns true if `parcel` is a well-formed `c.xadd`.
pub const fn is_c_xadd(parcel: u16) -> bool {
    parcel & QUADRANT_MASK == QUADRANT_0
        && funct3(parcel) == q0::RESERVED
        && parcel & C_XADD_ZERO_MASK == 0
}

/// Encodes `c.xadd` from compressed register numbers (0-7, meaning x8-x15).
pub const fn encode_c_xadd(rd_c: u16, rs2_c: u16) -> u16 {
    (q0::RESERVED << 13) | ((rd_c & 0x7) << 7) | ((rs2_c & 0x7) << 2) | QUADRANT_0
}

/// Expands `c.xadd` to its 32-bit `xadd`, or `None` for any other parcel.
pub const fn expand(parcel: u16) -> Option<u32> {
    if !is_c_xadd(parcel) {
        return None;
    }
    let rd = CREG_BASE + ((parcel >> 7) & 0x7) as u32;
    let rs2 = CREG_BASE + ((parcel >> 2) & 0x7) as u32;
    Some(encode_r(0, rs2, rd, x_f3::XADD, rd, OPCODE_CUSTOM_0))
}
