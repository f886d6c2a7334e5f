//! End-to-End Simulation Tests.
//!
//! Scenarios run through `Simulator` with the reference accelerator: the
//! core fetches, offloads, commits or kills, and retired values land in the
//! register file.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rstest::rstest;
use xifsim_core::common::SimError;
use xifsim_core::config::{Config, ReadyPolicy};
use xifsim_core::isa::rvc::expand::encode_c_xadd;
use xifsim_core::isa::xcustom::{xadd, xld2, xlw, xmac, xmul, xsw};
use xifsim_core::sim::loader::Word;
use xifsim_core::sim::{RunSummary, Scenario, Simulator};

use crate::common::harness::init_tracing;

const BOOT: u32 = 0x180;
const ADDI: u32 = 0x0000_0013;

fn scenario(program: &[u32], regs: &[(usize, u32)], memory: &[(u32, u32)]) -> Scenario {
    let mut scenario = Scenario::from_program("test", program);
    scenario.regs = regs
        .iter()
        .map(|&(reg, value)| (reg.to_string(), Word::from(value)))
        .collect();
    scenario.memory = memory
        .iter()
        .map(|&(addr, value)| (format!("{addr:#x}"), Word::from(value)))
        .collect::<BTreeMap<_, _>>();
    scenario
}

fn run(config: &Config, scenario: &Scenario) -> RunSummary {
    init_tracing();
    let mut sim = Simulator::new(config, scenario).unwrap();
    sim.run(Some(500)).unwrap()
}

fn reg(summary: &RunSummary, idx: usize) -> u32 {
    summary
        .regs
        .iter()
        .find(|&&(r, _)| r == idx)
        .map_or(0, |&(_, value)| value)
}

// ══════════════════════════════════════════════════════════
// 1. Single instructions
// ══════════════════════════════════════════════════════════

#[test]
fn load_from_memory() {
    let summary = run(
        &Config::default(),
        &scenario(&[xlw(10, 11, 0)], &[(11, 0x1000)], &[(0x1000, 0xDEAD_BEEF)]),
    );
    assert_eq!(reg(&summary, 10), 0xDEAD_BEEF);
    assert_eq!(summary.stats.retired, 1);
    assert_eq!(summary.stats.mem_requests, 1);
    assert!(summary.stats.balanced());
}

#[rstest]
#[case::add(xadd(10, 11, 12), 13)]
#[case::mul(xmul(10, 11, 12), 42)]
fn alu_ops(#[case] instr: u32, #[case] expected: u32) {
    let summary = run(&Config::default(), &scenario(&[instr], &[(11, 6), (12, 7)], &[]));
    assert_eq!(reg(&summary, 10), expected);
}

#[test]
fn pair_load_sums_adjacent_words() {
    let summary = run(
        &Config::default(),
        &scenario(&[xld2(10, 11)], &[(11, 0x800)], &[(0x800, 40), (0x804, 2)]),
    );
    assert_eq!(reg(&summary, 10), 42);
    assert_eq!(summary.stats.mem_results, 2);
}

#[test]
fn native_instructions_are_only_counted() {
    let summary = run(&Config::default(), &scenario(&[ADDI, ADDI, ADDI], &[], &[]));
    assert_eq!(summary.stats.native_instructions, 3);
    assert_eq!(summary.stats.issue_offered, 0);
    assert_eq!(summary.stats.fetches, 3);
    assert_eq!(summary.stats.offloaded, 0);
    assert!(summary.regs.is_empty());
}

#[test]
fn core_counters_reach_the_report() {
    let summary = run(
        &Config::default(),
        &scenario(&[ADDI, xadd(10, 11, 12), xmul(13, 11, 12)], &[(11, 2), (12, 3)], &[]),
    );
    assert_eq!(summary.stats.fetches, 3);
    assert_eq!(summary.stats.offloaded, 2);
    assert_eq!(summary.stats.issue_accepted, 2);
    assert_eq!(summary.stats.native_instructions, 1);
    assert_eq!(summary.stats.writebacks, 2);
}

// ══════════════════════════════════════════════════════════
// 2. Ordering
// ══════════════════════════════════════════════════════════

#[test]
fn store_then_load_sees_the_store() {
    let summary = run(
        &Config::default(),
        &scenario(
            &[xsw(12, 11, 4), xlw(10, 11, 4)],
            &[(11, 0x1000), (12, 0x55)],
            &[],
        ),
    );
    assert_eq!(reg(&summary, 10), 0x55);
}

#[test]
fn dependent_offload_waits_for_its_producer() {
    let summary = run(
        &Config::default(),
        &scenario(&[xadd(10, 11, 12), xadd(13, 10, 10)], &[(11, 2), (12, 3)], &[]),
    );
    assert_eq!(reg(&summary, 13), 10);
    assert!(summary.stats.hazard_stalls > 0);
}

#[test]
fn mac_accumulates_across_instructions() {
    let summary = run(
        &Config::default(),
        &scenario(&[xmac(5, 1, 2), xmac(6, 1, 2)], &[(1, 3), (2, 4)], &[]),
    );
    assert_eq!((reg(&summary, 5), reg(&summary, 6)), (12, 24));
    assert_eq!(summary.extension, vec![("acc", 24)]);
}

// ══════════════════════════════════════════════════════════
// 3. Kill
// ══════════════════════════════════════════════════════════

#[test]
fn killed_offload_leaves_no_trace() {
    let mut scenario = scenario(&[xadd(10, 11, 12)], &[(11, 1), (12, 1)], &[]);
    scenario.kill = vec![Word::from(BOOT)];
    let summary = run(&Config::default(), &scenario);
    assert_eq!(reg(&summary, 10), 0);
    assert_eq!(summary.stats.killed, 1);
    assert_eq!(summary.stats.retired, 0);
}

#[test]
fn killed_speculative_load_is_drained() {
    let mut scenario = scenario(&[xlw(10, 11, 0)], &[(11, 0x100)], &[(0x100, 9)]);
    scenario.kill = vec![Word::from(BOOT)];
    let summary = run(&Config::default(), &scenario);
    assert_eq!(reg(&summary, 10), 0);
    assert_eq!(summary.stats.mem_discarded, 1);
    assert!(summary.stats.balanced());
}

#[test]
fn killed_mac_does_not_touch_the_accumulator() {
    let mut scenario = scenario(&[xmac(5, 1, 2), xmac(6, 1, 2)], &[(1, 3), (2, 4)], &[]);
    scenario.kill = vec![Word::from(BOOT)];
    let summary = run(&Config::default(), &scenario);
    assert_eq!((reg(&summary, 5), reg(&summary, 6)), (0, 12));
}

// ══════════════════════════════════════════════════════════
// 4. Compressed channel
// ══════════════════════════════════════════════════════════

#[test]
fn c_xadd_is_expanded_and_offloaded() {
    let parcel = u32::from(encode_c_xadd(0, 1));
    let summary = run(&Config::default(), &scenario(&[parcel, ADDI], &[(8, 5), (9, 7)], &[]));
    assert_eq!(reg(&summary, 8), 12);
    assert_eq!(summary.stats.compressed_accepted, 1);
    assert_eq!(summary.stats.native_instructions, 1);
}

#[test]
fn refused_parcel_falls_back_to_the_core() {
    let mut config = Config::default();
    config.accelerator.compressed = false;
    let parcel = u32::from(encode_c_xadd(0, 1));
    let summary = run(&config, &scenario(&[parcel], &[(8, 5), (9, 7)], &[]));
    assert_eq!(reg(&summary, 8), 5);
    assert_eq!(summary.stats.native_instructions, 1);
    assert_eq!(summary.stats.compressed_offered, 1);
}

// ══════════════════════════════════════════════════════════
// 5. Timing knobs
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1, ReadyPolicy::Always)]
#[case(3, ReadyPolicy::Always)]
#[case(1, ReadyPolicy::Periodic { period: 3, stall: 2 })]
#[case(5, ReadyPolicy::Periodic { period: 4, stall: 1 })]
fn timing_does_not_change_results(#[case] latency: u64, #[case] ready: ReadyPolicy) {
    let mut config = Config::default();
    config.memory.latency = latency;
    config.xif.mem_ready = ready;
    config.xif.result_ready = ready;
    let summary = run(
        &config,
        &scenario(
            &[xsw(12, 11, 0), xld2(10, 11), xadd(13, 10, 12)],
            &[(11, 0x400), (12, 8)],
            &[(0x404, 30)],
        ),
    );
    assert_eq!(reg(&summary, 10), 38);
    assert_eq!(reg(&summary, 13), 46);
}

#[test]
fn small_tracker_and_queue_still_drain() {
    let mut config = Config::default();
    config.xif.capacity = 1;
    config.accelerator.queue_depth = 1;
    let program: Vec<u32> = (0..6).map(|n| xadd(10 + n, 1, 2)).collect();
    let summary = run(&config, &scenario(&program, &[(1, 1), (2, 2)], &[]));
    assert!((10..16).all(|r| reg(&summary, r) == 3));
    assert_eq!(summary.stats.retired, 6);
    assert_eq!(summary.stats.peak_in_flight, 1);
    assert!(summary.stats.capacity_stalls > 0 || summary.stats.issue_stalls > 0);
}

// ══════════════════════════════════════════════════════════
// 6. Failures
// ══════════════════════════════════════════════════════════

#[test]
fn budget_exhaustion_is_a_timeout() {
    let mut sim = Simulator::new(
        &Config::default(),
        &scenario(&[xlw(10, 11, 0)], &[(11, 0x1000)], &[]),
    )
    .unwrap();
    assert!(matches!(sim.run(Some(1)), Err(SimError::Timeout(1))));
}

#[rstest]
#[case::commit(|c: &mut Config| c.core.commit_latency = u64::MAX)]
#[case::memory(|c: &mut Config| c.memory.latency = u64::MAX)]
#[case::accelerator(|c: &mut Config| c.accelerator.latency = u64::MAX)]
fn huge_latency_never_completes(#[case] tweak: fn(&mut Config)) {
    let mut config = Config::default();
    tweak(&mut config);
    assert!(config.validate().is_ok());

    let mut sim = Simulator::new(
        &config,
        &scenario(&[ADDI, ADDI, xlw(10, 11, 0)], &[(11, 0x1000)], &[]),
    )
    .unwrap();
    assert!(matches!(sim.run(Some(50)), Err(SimError::Timeout(50))));
    assert_eq!(sim.stats().retired, 0);
}

#[test]
fn load_outside_memory_is_a_bus_fault() {
    let mut sim = Simulator::new(
        &Config::default(),
        &scenario(&[xlw(10, 11, 0)], &[(11, 0x2000_0000)], &[]),
    )
    .unwrap();
    assert!(matches!(
        sim.run(Some(100)),
        Err(SimError::BusFault {
            addr: 0x2000_0000,
            ..
        })
    ));
}

#[test]
fn invalid_config_is_refused() {
    let mut config = Config::default();
    config.xif.capacity = 0;
    assert!(matches!(
        Simulator::new(&config, &scenario(&[], &[], &[])),
        Err(SimError::Config(_))
    ));
}

#[test]
fn program_too_large_for_memory() {
    let mut config = Config::default();
    config.memory.size = 0x184;
    assert!(matches!(
        Simulator::new(&config, &scenario(&[ADDI, ADDI], &[], &[])),
        Err(SimError::BusFault { .. })
    ));
}
