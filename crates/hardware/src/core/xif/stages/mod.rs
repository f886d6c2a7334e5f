//! Extension interface stage contracts.
//!
//! Each module adds the methods of one channel to `XifArbiter`:
//! 1. **Compressed:** `offer_compressed`.
//! 2. **Issue:** `offer_issue`.
//! 3. **Commit:** `commit`.
//! 4. **Memory:** `request_memory` and `complete_memory`.
//! 5. **Result:** `produce_result`.

/// Compressed-decode stage.
pub mod compressed;

/// Commit stage.
pub mod commit;

/// Issue stage.
pub mod issue;

/// Memory request and result stages.
pub mod memory;

/// Result stage.
pub mod result;
