//! Instruction encoding tests.

/// Disassembly of every accelerator form.
pub mod disasm;
