//! Interrupt Pin Tests.

use rstest::rstest;
use xifsim_core::soc::interrupts::{IrqLines, irq_ack, irq_id};

#[rstest]
#[case::software(1 << 3)]
#[case::timer(1 << 7)]
#[case::external(1 << 11)]
#[case::fast_0(1 << 16)]
#[case::fast_15(1 << 31)]
fn wired_lines_are_sampled(#[case] vector: u32) {
    let lines = IrqLines::new(vector);
    assert_eq!(lines.bits(), vector);
    assert!(lines.any());
}

#[test]
fn unwired_bits_are_masked() {
    let lines = IrqLines::new(0x0000_0FFF);
    assert_eq!(lines.bits(), 0x0000_0888);
    assert!(lines.software());
    assert!(lines.timer());
    assert!(lines.external());
    assert!(!IrqLines::new(0x0000_0777).any());
}

#[test]
fn fast_lines_by_index() {
    let lines = IrqLines::new(1 << (16 + 5));
    assert!(lines.fast(5));
    assert!(!lines.fast(4));
    assert!(!lines.fast(16));
}

#[test]
fn acknowledge_outputs_are_tied_off() {
    assert!(!irq_ack());
    assert_eq!(irq_id(), 0);
}
