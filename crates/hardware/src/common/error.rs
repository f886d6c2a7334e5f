//! Protocol and Simulation Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Protocol Errors:** `XifError`, raised by the tracker and the extension-interface stages.
//! 2. **Simulation Errors:** `SimError`, covering configuration, loading, bus and run-budget failures.
//! 3. **Fatality:** Which protocol errors abort a run and which are recoverable backpressure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::xif::signals::Stage;
use crate::core::xif::tracker::InstrId;

/// Errors raised by the extension-interface protocol model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum XifError {
    /// Every slot of the instruction tracker is occupied.
    ///
    /// Fails only the offending allocation; the issue path treats it as backpressure.
    #[error("instruction tracker full: all {capacity} in-flight slots are occupied")]
    CapacityExceeded {
        /// Configured tracker capacity.
        capacity: usize,
    },

    /// The id was never allocated or has already been retired.
    #[error("unknown instruction id {0}: not allocated or already retired")]
    UnknownId(InstrId),

    /// A stage was invoked out of the required order, or twice.
    #[error("protocol violation on {stage} channel{}: {reason}", describe_id(.id))]
    ProtocolViolation {
        /// Channel on which the violation was detected.
        stage: Stage,
        /// Instruction the offending transaction referred to, if any.
        id: Option<InstrId>,
        /// Human readable description of the broken rule.
        reason: String,
    },
}

fn describe_id(id: &Option<InstrId>) -> String {
    id.map_or_else(String::new, |id| format!(" for id {id}"))
}

impl XifError {
    /// Builds a `ProtocolViolation` for an instruction id.
    pub fn violation(stage: Stage, id: InstrId, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            stage,
            id: Some(id),
            reason: reason.into(),
        }
    }

    /// Returns true if this error must abort the simulation run.
    ///
    /// Only `CapacityExceeded` is recoverable: it is resolved by stalling the
    /// issue channel until a slot frees up.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Result alias for protocol operations.
pub type XifResult<T> = Result<T, XifError>;

/// Errors raised while configuring, loading or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The protocol model detected a fault.
    #[error(transparent)]
    Xif(#[from] XifError),

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A scenario or configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A scenario or configuration file is not valid JSON for its schema.
    #[error("malformed input: {0}")]
    Parse(#[from] serde_json::Error),

    /// A scenario entry could not be interpreted.
    #[error("invalid scenario: {0}")]
    Scenario(String),

    /// The instruction port was asked for a non word-aligned address.
    #[error("instruction fetch from misaligned address {0:#010x}")]
    MisalignedFetch(u32),

    /// A port accessed memory outside the mapped region or misaligned.
    #[error("bus fault at {addr:#010x}: {reason}")]
    BusFault {
        /// Faulting address.
        addr: u32,
        /// Why the access was refused.
        reason: &'static str,
    },

    /// The run did not drain within the cycle budget.
    #[error("simulation did not drain within {0} cycles")]
    Timeout(u64),
}
