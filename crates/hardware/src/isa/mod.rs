//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the encodings the subsystem inspects: the generic RV32 field
//! layout, the reference accelerator's custom-0 instructions, and the
//! compressed `c.xadd` parcel it expands.
//!
//! # Modules
//!
//! * `instruction`: Field extraction and R/I/S-type encoders.
//! * `xcustom`: Custom-0 accelerator instructions.
//! * `rvc`: Compressed parcel classification and expansion.
//! * `disasm`: Mnemonics for trace output.

/// Instruction disassembler for trace output.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Compressed instruction handling (16-bit parcels).
pub mod rvc;

/// Custom-0 accelerator instructions.
pub mod xcustom;
