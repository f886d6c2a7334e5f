//! SimStats unit tests.

use xifsim_core::stats::{STATS_SECTIONS, SimStats};

#[test]
fn default_stats_all_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.issue_offered, 0);
    assert_eq!(stats.retired, 0);
    assert_eq!(stats.killed, 0);
    assert_eq!(stats.mem_requests, 0);
    assert_eq!(stats.peak_in_flight, 0);
    assert!(stats.balanced());
}

#[test]
fn ipc_guards_against_zero_cycles() {
    let mut stats = SimStats::default();
    stats.retired = 3;
    assert!((stats.offload_ipc() - 3.0).abs() < f64::EPSILON);
    stats.cycles = 12;
    assert!((stats.offload_ipc() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn balance_counts_kills() {
    let mut stats = SimStats::default();
    stats.issue_accepted = 5;
    stats.retired = 3;
    assert!(!stats.balanced());
    stats.killed = 2;
    assert!(stats.balanced());
}

#[test]
fn json_has_every_counter_but_not_the_clock() {
    let value = serde_json::to_value(SimStats::default()).unwrap();
    let object = value.as_object().unwrap();
    assert!(object.contains_key("cycles"));
    assert!(object.contains_key("mem_discarded"));
    assert!(object.contains_key("hazard_stalls"));
    assert!(object.contains_key("fetches"));
    assert!(object.contains_key("offloaded"));
    assert!(!object.contains_key("start_time"));
}

#[test]
fn section_names() {
    assert_eq!(STATS_SECTIONS, &["summary", "issue", "memory", "result", "core"]);
    // Printing must not panic for any selection.
    SimStats::default().print_sections(&["memory".to_string()]);
    SimStats::default().print();
}
