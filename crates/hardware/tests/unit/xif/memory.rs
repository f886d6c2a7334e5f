//! Memory Request and Result Channel Tests.
//!
//! Request legality, data port backpressure, per-id response order, and the
//! fate of responses owed to killed instructions.

use pretty_assertions::assert_eq;
use xifsim_core::common::XifError;
use xifsim_core::config::{ReadyPolicy, XifConfig};
use xifsim_core::core::xif::signals::{Handshake, MemRequest, MemResponse, MemResult};
use xifsim_core::core::xif::{InstrId, Stage, XifState};
use xifsim_core::isa::xcustom::xlw;

use crate::common::harness::TestContext;

fn is_violation<T>(result: Result<T, XifError>, expected: Stage) -> bool {
    matches!(result, Err(XifError::ProtocolViolation { stage, .. }) if stage == expected)
}

// ══════════════════════════════════════════════════════════
// 1. Request legality
// ══════════════════════════════════════════════════════════

#[test]
fn request_is_queued_on_the_record() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    let request = MemRequest::read(id, 0x1000);
    assert_eq!(ctx.arbiter.request_memory(request), Ok(Handshake::Accepted));
    let record = ctx.arbiter.lookup(id).unwrap();
    assert_eq!(record.mem_pending.front(), Some(&request));
    assert_eq!(ctx.arbiter.stats().mem_requests, 1);
}

#[test]
fn request_before_acceptance_is_a_violation() {
    let mut ctx = TestContext::new();
    let id = ctx.allocate(xlw(10, 11, 0));
    assert!(is_violation(
        ctx.arbiter.request_memory(MemRequest::read(id, 0)),
        Stage::MemRequest
    ));
}

#[test]
fn request_without_loadstore_is_a_violation() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_alu();
    assert!(is_violation(
        ctx.arbiter.request_memory(MemRequest::read(id, 0)),
        Stage::MemRequest
    ));
}

#[test]
fn request_for_unknown_id_is_a_violation() {
    let mut ctx = TestContext::new();
    assert!(is_violation(
        ctx.arbiter.request_memory(MemRequest::write(InstrId(2), 0, 1)),
        Stage::MemRequest
    ));
}

#[test]
fn request_after_commit_is_allowed() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    ctx.arbiter.commit(id, false).unwrap();
    assert_eq!(
        ctx.arbiter.request_memory(MemRequest::write(id, 0x20, 5)),
        Ok(Handshake::Accepted)
    );
}

// ══════════════════════════════════════════════════════════
// 2. Backpressure
// ══════════════════════════════════════════════════════════

#[test]
fn one_request_per_step() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    assert!(ctx.arbiter.request_memory(MemRequest::read(id, 0)).unwrap().is_accepted());
    assert_eq!(
        ctx.arbiter.request_memory(MemRequest::read(id, 4)),
        Ok(Handshake::Stalled)
    );
    ctx.step();
    assert!(ctx.arbiter.request_memory(MemRequest::read(id, 4)).unwrap().is_accepted());
    assert_eq!(ctx.arbiter.lookup(id).unwrap().mem_pending_count(), 2);
    assert_eq!(ctx.arbiter.stats().mem_stalls, 1);
}

#[test]
fn periodic_grant_stalls_requests() {
    let mut ctx = TestContext::with_config(XifConfig {
        mem_ready: ReadyPolicy::Periodic { period: 2, stall: 1 },
        ..XifConfig::default()
    });
    // Issue spends cycle 0; cycle 1 is a grant cycle.
    let id = ctx.issue_load();
    assert_eq!(ctx.arbiter.cycle(), 1);
    assert!(ctx.arbiter.request_memory(MemRequest::read(id, 0)).unwrap().is_accepted());
    ctx.step();
    assert_eq!(
        ctx.arbiter.request_memory(MemRequest::read(id, 4)),
        Ok(Handshake::Stalled)
    );
    assert_eq!(ctx.arbiter.lookup(id).unwrap().mem_pending_count(), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Responses
// ══════════════════════════════════════════════════════════

#[test]
fn responses_complete_in_request_order() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    let read = MemRequest::read(id, 0x100);
    let write = MemRequest::write(id, 0x104, 9);
    let _ = ctx.arbiter.request_memory(read).unwrap();
    ctx.step();
    let _ = ctx.arbiter.request_memory(write).unwrap();

    // The write ack cannot overtake the older read.
    assert!(is_violation(
        ctx.arbiter.complete_memory(id, MemResponse::WriteAck),
        Stage::MemResult
    ));
}

#[test]
fn results_are_forwarded_in_order() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    let read = MemRequest::read(id, 0x100);
    let write = MemRequest::write(id, 0x104, 9);
    let _ = ctx.arbiter.request_memory(read).unwrap();
    ctx.step();
    let _ = ctx.arbiter.request_memory(write).unwrap();

    let first = ctx.arbiter.complete_memory(id, MemResponse::Read(0xAA)).unwrap();
    let second = ctx.arbiter.complete_memory(id, MemResponse::WriteAck).unwrap();
    let expected = vec![
        MemResult {
            id,
            rdata: 0xAA,
            request: read,
        },
        MemResult {
            id,
            rdata: 0,
            request: write,
        },
    ];
    assert_eq!(vec![first.unwrap(), second.unwrap()], expected);
    assert_eq!(ctx.script().mem_results, expected);
    assert_eq!(ctx.arbiter.lookup(id).unwrap().mem_pending_count(), 0);
}

#[test]
fn response_without_request_is_a_violation() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    assert!(is_violation(
        ctx.arbiter.complete_memory(id, MemResponse::Read(0)),
        Stage::MemResult
    ));
}

#[test]
fn killed_instruction_drains_then_releases() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    let _ = ctx.arbiter.request_memory(MemRequest::read(id, 0x10)).unwrap();
    ctx.arbiter.commit(id, true).unwrap();
    assert_eq!(ctx.state(id), XifState::Killed);
    assert!(!ctx.arbiter.lookup(id).unwrap().result_pending);

    assert!(is_violation(
        ctx.arbiter.request_memory(MemRequest::read(id, 0x14)),
        Stage::MemRequest
    ));
}

#[test]
fn killed_response_is_discarded() {
    let mut ctx = TestContext::new();
    let id = ctx.issue_load();
    let _ = ctx.arbiter.request_memory(MemRequest::read(id, 0x10)).unwrap();
    ctx.arbiter.commit(id, true).unwrap();

    assert_eq!(ctx.arbiter.complete_memory(id, MemResponse::Read(1)), Ok(None));
    assert!(ctx.script().mem_results.is_empty());
    assert!(!ctx.arbiter.tracker().contains(id));
    assert_eq!(ctx.arbiter.stats().mem_discarded, 1);
}
