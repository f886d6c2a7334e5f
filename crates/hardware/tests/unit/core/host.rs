//! Core Host Model Tests.
//!
//! Fetch routing (native, compressed channel, issue), the scoreboard hazard
//! check, commit scheduling and register writeback, driven through the
//! `XifHost` calls the arbiter makes.

use pretty_assertions::assert_eq;
use xifsim_core::config::Config;
use xifsim_core::core::cpu::{Core, HeldInstr};
use xifsim_core::core::xif::signals::{
    CommitRequest, CompressedResponse, IssueResponse, MemRequest, MemResponse, Retirement,
};
use xifsim_core::core::xif::{InstrId, OffloadCandidate, XifHost};
use xifsim_core::isa::rvc::expand::encode_c_xadd;
use xifsim_core::isa::xcustom::{xadd, xlw, xsw};
use xifsim_core::sim::Scenario;
use xifsim_core::soc::memory::Memory;

const BOOT: u32 = 0x180;
const ADDI: u32 = 0x0000_0013;
const C_NOP: u32 = 0x0001;

fn core_with(program: &[u32]) -> Core {
    let config = Config::default();
    let loaded = Scenario::from_program("core", program).assemble(BOOT).unwrap();
    let mut memory = Memory::new(0, 4096);
    memory.load(BOOT, &loaded.image).unwrap();
    let mut core = Core::new(&config, memory);
    core.set_program_end(BOOT + loaded.image.len() as u32);
    core
}

fn accept(core: &mut Core, id: u32, cycle: u64) {
    core.issue_done(InstrId(id), IssueResponse::accept(true, false), cycle);
}

// ══════════════════════════════════════════════════════════
// 1. Fetch routing
// ══════════════════════════════════════════════════════════

#[test]
fn standard_instruction_runs_natively() {
    let mut core = core_with(&[ADDI]);
    core.fetch().unwrap();
    assert_eq!(core.stats.native_instructions, 1);
    assert_eq!(core.pc, BOOT + 4);
    assert_eq!(core.held, None);
    assert!(core.is_idle());
}

#[test]
fn custom_opcode_is_held_for_issue() {
    let mut core = core_with(&[xadd(10, 11, 12), ADDI]);
    core.fetch().unwrap();
    let held = HeldInstr::Offload {
        pc: BOOT,
        instr: xadd(10, 11, 12),
        len: 4,
        compressed: false,
    };
    assert_eq!(core.held, Some(held));
    // A held instruction blocks fetch.
    core.fetch().unwrap();
    assert_eq!(core.held, Some(held));
    assert_eq!(core.pc, BOOT);
    assert!(!core.is_idle());
}

#[test]
fn reserved_parcel_is_held_for_expansion() {
    let parcel = encode_c_xadd(0, 1);
    let mut core = core_with(&[u32::from(parcel)]);
    core.fetch().unwrap();
    assert_eq!(core.held, Some(HeldInstr::Parcel { pc: BOOT, parcel }));
    assert_eq!(core.compressed_offer(), Some(parcel));
    assert_eq!(core.issue_offer(), None);
}

#[test]
fn instruction_straddling_a_word_is_reassembled() {
    let mut core = core_with(&[C_NOP, xadd(10, 11, 12)]);
    core.fetch().unwrap();
    assert_eq!(core.pc, BOOT + 2);
    core.fetch().unwrap();
    assert!(matches!(
        core.held,
        Some(HeldInstr::Offload { pc, instr, len: 4, .. }) if pc == BOOT + 2 && instr == xadd(10, 11, 12)
    ));
    assert_eq!(core.instr_port.fetches(), 3);
}

#[test]
fn refused_parcel_runs_natively() {
    let parcel = encode_c_xadd(0, 1);
    let mut core = core_with(&[u32::from(parcel)]);
    core.fetch().unwrap();
    core.compressed_done(CompressedResponse::refuse());
    assert_eq!(core.held, None);
    assert_eq!(core.pc, BOOT + 2);
    assert_eq!(core.stats.native_instructions, 1);
}

#[test]
fn expanded_parcel_moves_to_issue() {
    let parcel = encode_c_xadd(0, 1);
    let mut core = core_with(&[u32::from(parcel)]);
    core.fetch().unwrap();
    core.compressed_done(CompressedResponse::expand(xadd(8, 8, 9)));
    let candidate = core.issue_offer().unwrap();
    assert_eq!(candidate.instr, xadd(8, 8, 9));
    assert!(candidate.compressed);

    accept(&mut core, 0, 0);
    assert_eq!(core.pc, BOOT + 2);
}

// ══════════════════════════════════════════════════════════
// 2. Issue and hazards
// ══════════════════════════════════════════════════════════

#[test]
fn candidate_samples_source_registers() {
    let mut core = core_with(&[xadd(10, 11, 12)]);
    core.regs.write(11, 5);
    core.regs.write(12, 6);
    core.fetch().unwrap();
    assert_eq!(
        core.issue_offer(),
        Some(OffloadCandidate::new(xadd(10, 11, 12)).with_operands([5, 6, 0]))
    );
}

#[test]
fn pending_producer_stalls_issue() {
    let mut core = core_with(&[xadd(10, 11, 12)]);
    core.scoreboard.set_producer(11, InstrId(3));
    core.fetch().unwrap();
    assert_eq!(core.issue_offer(), None);
    assert_eq!(core.stats.hazard_stalls, 1);

    core.writeback(Retirement {
        id: InstrId(3),
        instr: xadd(11, 1, 2),
        value: 9,
        rd: Some(11),
    });
    let candidate = core.issue_offer().unwrap();
    assert_eq!(candidate.rs[0], 9);
}

#[test]
fn immediate_bits_are_not_registers() {
    // imm[11:7] of xlw sits where rs3 would be; imm[4:0] of xsw where rd would be.
    let mut core = core_with(&[xlw(10, 11, 5 << 7), xsw(12, 11, 9)]);
    core.scoreboard.set_producer(5, InstrId(1));
    core.scoreboard.set_producer(9, InstrId(2));

    core.fetch().unwrap();
    assert!(core.issue_offer().is_some());
    accept(&mut core, 3, 0);
    core.fetch().unwrap();
    assert!(core.issue_offer().is_some());
    assert_eq!(core.stats.hazard_stalls, 0);
}

#[test]
fn store_waits_on_its_data_register() {
    let mut core = core_with(&[xsw(12, 11, 0)]);
    core.scoreboard.set_producer(12, InstrId(4));
    core.fetch().unwrap();
    assert_eq!(core.issue_offer(), None);
    assert_eq!(core.stats.hazard_stalls, 1);
}

#[test]
fn rejected_offload_runs_natively() {
    let mut core = core_with(&[xadd(10, 11, 12)]);
    core.fetch().unwrap();
    core.issue_done(InstrId(0), IssueResponse::reject(), 0);
    assert_eq!(core.held, None);
    assert_eq!(core.pc, BOOT + 4);
    assert_eq!(core.stats.native_instructions, 1);
    assert!(core.commit_queue.is_empty());
}

#[test]
fn store_does_not_claim_a_destination() {
    let mut core = core_with(&[xsw(12, 11, 0)]);
    core.fetch().unwrap();
    core.issue_done(InstrId(0), IssueResponse::accept(false, true), 0);
    assert!(core.scoreboard.is_clear());
    assert_eq!(core.stats.offloaded, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Commit and writeback
// ══════════════════════════════════════════════════════════

#[test]
fn commit_is_due_after_the_latency() {
    let mut core = core_with(&[xadd(10, 11, 12)]);
    core.fetch().unwrap();
    accept(&mut core, 2, 5);
    assert_eq!(core.scoreboard.producer(10), Some(InstrId(2)));
    assert_eq!(core.commit_offer(5), None);
    assert_eq!(
        core.commit_offer(6),
        Some(CommitRequest {
            id: InstrId(2),
            kill: false
        })
    );
    assert_eq!(core.commit_offer(7), None);
}

#[test]
fn kill_set_kills_and_clears_the_scoreboard() {
    let mut core = core_with(&[xadd(10, 11, 12)]);
    core.kill_at(BOOT);
    core.fetch().unwrap();
    accept(&mut core, 0, 0);
    assert_eq!(
        core.commit_offer(1),
        Some(CommitRequest {
            id: InstrId(0),
            kill: true
        })
    );
    assert!(core.scoreboard.is_clear());
}

#[test]
fn writeback_to_x0_is_discarded() {
    let mut core = core_with(&[]);
    core.writeback(Retirement {
        id: InstrId(0),
        instr: xadd(0, 1, 2),
        value: 99,
        rd: Some(0),
    });
    core.writeback(Retirement {
        id: InstrId(1),
        instr: xsw(1, 2, 0),
        value: 99,
        rd: None,
    });
    assert_eq!(core.regs.read(0), 0);
    assert_eq!(core.regs.non_zero().count(), 0);
    assert_eq!(core.stats.writebacks, 1);
}

#[test]
fn data_port_answers_after_memory_latency() {
    let mut core = core_with(&[]);
    core.data_request(MemRequest::write(InstrId(1), 0x400, 0xAB), 3)
        .unwrap();
    core.data_request(MemRequest::read(InstrId(1), 0x400), 4).unwrap();
    assert!(!core.is_idle());
    assert_eq!(core.data_response(3).unwrap(), None);
    assert_eq!(
        core.data_response(4).unwrap(),
        Some((InstrId(1), MemResponse::WriteAck))
    );
    assert_eq!(
        core.data_response(5).unwrap(),
        Some((InstrId(1), MemResponse::Read(0xAB)))
    );
    assert!(core.is_idle());
}
