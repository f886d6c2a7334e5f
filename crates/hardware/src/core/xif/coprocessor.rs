//! Extension-side interface.
//!
//! A `Coprocessor` is whatever sits on the far side of the extension
//! interface: the reference accelerator, a test double, or a model of a
//! third-party unit. The arbiter owns it and is the only caller.
//!
//! Core → extension channels are plain calls. Extension → core channels are
//! a peek of the payload the extension currently presents (`valid`) plus an
//! `*_accepted` call when the core completes the handshake; a payload that is
//! not accepted stays presented.

use crate::core::xif::signals::{
    CommitRequest, CompressedRequest, CompressedResponse, IssueRequest, IssueResponse, MemRequest,
    MemResult, ResultPayload,
};

/// External accelerator attached to the extension interface.
pub trait Coprocessor {
    /// Short name for logs.
    fn name(&self) -> &str {
        "coprocessor"
    }

    /// Compressed channel: expand, refuse, or stall.
    fn compressed(&mut self, req: &CompressedRequest) -> CompressedResponse;

    /// Issue channel: accept, reject, or stall.
    fn issue(&mut self, req: &IssueRequest) -> IssueResponse;

    /// Commit channel: commit or kill of a previously accepted instruction.
    fn commit(&mut self, commit: &CommitRequest);

    /// Memory request currently presented, if any.
    fn mem_request(&self) -> Option<MemRequest>;

    /// The presented memory request was accepted by the core.
    fn mem_request_accepted(&mut self);

    /// Memory result channel: response to an accepted request.
    fn mem_result(&mut self, result: &MemResult);

    /// Result currently presented, if any.
    fn result(&self) -> Option<ResultPayload>;

    /// The presented result was accepted by the core.
    fn result_accepted(&mut self);

    /// Advances internal state by one cycle.
    fn tick(&mut self) {}

    /// True when the extension holds no instruction.
    fn is_idle(&self) -> bool {
        true
    }

    /// Named architectural registers of the extension, for reports.
    fn registers(&self) -> Vec<(&'static str, u32)> {
        Vec::new()
    }
}
