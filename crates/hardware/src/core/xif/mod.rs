//! Extension interface (xif) protocol model.
//!
//! This module contains the handshake protocol between the core and an
//! external accelerator. It includes the following components:
//! 1. **Tracker:** Fixed-size table of in-flight offloaded instructions.
//! 2. **Signals:** Payloads of the compressed, issue, commit, memory and result channels.
//! 3. **Stages:** The per-channel contracts, enforcing the ordering invariants.
//! 4. **Arbiter:** The single entry point that sequences the stages and advances time.
//! 5. **Seams:** `Coprocessor` (extension side) and `XifHost` (core side).

/// Protocol arbiter and per-step evaluation.
pub mod arbiter;

/// Extension-side trait.
pub mod coprocessor;

/// Core-side trait.
pub mod host;

/// Channel payloads and stage identifiers.
pub mod signals;

/// Per-channel stage contracts.
pub mod stages;

/// In-flight instruction tracker.
pub mod tracker;

pub use arbiter::XifArbiter;
pub use coprocessor::Coprocessor;
pub use host::XifHost;
pub use signals::Stage;
pub use tracker::{InstrId, InstructionRecord, InstructionTracker, OffloadCandidate, XifState};
