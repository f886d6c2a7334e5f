use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use mockall::mock;
use xifsim_core::core::xif::coprocessor::Coprocessor;
use xifsim_core::core::xif::signals::{
    CommitRequest, CompressedRequest, CompressedResponse, IssueRequest, IssueResponse, MemRequest,
    MemResult, ResultPayload,
};

mock! {
    pub Coprocessor {}
    impl Coprocessor for Coprocessor {
        fn compressed(&mut self, req: &CompressedRequest) -> CompressedResponse;
        fn issue(&mut self, req: &IssueRequest) -> IssueResponse;
        fn commit(&mut self, commit: &CommitRequest);
        fn mem_request(&self) -> Option<MemRequest>;
        fn mem_request_accepted(&mut self);
        fn mem_result(&mut self, result: &MemResult);
        fn result(&self) -> Option<ResultPayload>;
        fn result_accepted(&mut self);
    }
}

/// Behaviour and observations of a `ScriptedCoprocessor`, shared with the test.
#[derive(Debug)]
pub struct Script {
    /// Compressed channel `ready`.
    pub compressed_ready: bool,
    /// Expansion returned for every parcel; `None` refuses.
    pub expansion: Option<u32>,
    /// Issue channel `ready`.
    pub issue_ready: bool,
    /// Issue decision.
    pub accept: bool,
    /// `writeback` flag of an accepted issue.
    pub writeback: bool,
    /// `loadstore` flag of an accepted issue.
    pub loadstore: bool,
    /// Memory requests to present, front first.
    pub mem_queue: VecDeque<MemRequest>,
    /// Results to present, front first.
    pub result_queue: VecDeque<ResultPayload>,
    /// Every issue request seen.
    pub issued: Vec<IssueRequest>,
    /// Every commit seen.
    pub commits: Vec<CommitRequest>,
    /// Every memory result delivered.
    pub mem_results: Vec<MemResult>,
    /// Steps seen.
    pub ticks: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            compressed_ready: true,
            expansion: None,
            issue_ready: true,
            accept: true,
            writeback: true,
            loadstore: false,
            mem_queue: VecDeque::new(),
            result_queue: VecDeque::new(),
            issued: Vec::new(),
            commits: Vec::new(),
            mem_results: Vec::new(),
            ticks: 0,
        }
    }
}

/// A coprocessor whose every answer comes from a shared `Script`.
#[derive(Debug)]
pub struct ScriptedCoprocessor {
    script: Rc<RefCell<Script>>,
}

impl ScriptedCoprocessor {
    pub fn new(script: Rc<RefCell<Script>>) -> Self {
        Self { script }
    }
}

impl Coprocessor for ScriptedCoprocessor {
    fn name(&self) -> &str {
        "scripted"
    }

    fn compressed(&mut self, _req: &CompressedRequest) -> CompressedResponse {
        let script = self.script.borrow();
        if !script.compressed_ready {
            return CompressedResponse::stall();
        }
        script
            .expansion
            .map_or_else(CompressedResponse::refuse, CompressedResponse::expand)
    }

    fn issue(&mut self, req: &IssueRequest) -> IssueResponse {
        let mut script = self.script.borrow_mut();
        if !script.issue_ready {
            return IssueResponse::stall();
        }
        script.issued.push(*req);
        if script.accept {
            IssueResponse::accept(script.writeback, script.loadstore)
        } else {
            IssueResponse::reject()
        }
    }

    fn commit(&mut self, commit: &CommitRequest) {
        let mut script = self.script.borrow_mut();
        script.commits.push(*commit);
        if commit.kill {
            script.mem_queue.retain(|req| req.id != commit.id);
            script.result_queue.retain(|res| res.id != commit.id);
        }
    }

    fn mem_request(&self) -> Option<MemRequest> {
        self.script.borrow().mem_queue.front().copied()
    }

    fn mem_request_accepted(&mut self) {
        let _ = self.script.borrow_mut().mem_queue.pop_front();
    }

    fn mem_result(&mut self, result: &MemResult) {
        self.script.borrow_mut().mem_results.push(*result);
    }

    fn result(&self) -> Option<ResultPayload> {
        self.script.borrow().result_queue.front().copied()
    }

    fn result_accepted(&mut self) {
        let _ = self.script.borrow_mut().result_queue.pop_front();
    }

    fn tick(&mut self) {
        self.script.borrow_mut().ticks += 1;
    }

    fn is_idle(&self) -> bool {
        let script = self.script.borrow();
        script.mem_queue.is_empty() && script.result_queue.is_empty()
    }
}
