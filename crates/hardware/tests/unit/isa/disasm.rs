//! Disassembler Tests.

use rstest::rstest;
use xifsim_core::isa::disasm::disassemble;
use xifsim_core::isa::rvc::expand::encode_c_xadd;
use xifsim_core::isa::xcustom::{xadd, xld2, xlw, xmac, xmul, xsw};

#[rstest]
#[case(xadd(10, 11, 12), "xadd a0, a1, a2")]
#[case(xmul(5, 6, 7), "xmul t0, t1, t2")]
#[case(xmac(0, 1, 2), "xmac zero, ra, sp")]
#[case(xlw(10, 2, -4), "xlw a0, -4(sp)")]
#[case(xlw(31, 8, 2047), "xlw t6, 2047(s0)")]
#[case(xsw(11, 2, 8), "xsw a1, 8(sp)")]
#[case(xsw(11, 2, -2048), "xsw a1, -2048(sp)")]
#[case(xld2(12, 5), "xld2 a2, (t0)")]
fn accelerator_forms(#[case] instr: u32, #[case] text: &str) {
    assert_eq!(disassemble(instr), text);
}

#[test]
fn compressed_forms() {
    assert_eq!(disassemble(u32::from(encode_c_xadd(0, 7))), "c.xadd s0, a5");
    assert_eq!(disassemble(0x4000), ".half 0x4000");
}

#[test]
fn foreign_words_are_raw() {
    assert_eq!(disassemble(0x0010_0073), ".word 0x00100073");
}
