//! Compressed-decode stage.
//!
//! Offers a 16-bit parcel to the extension. An expansion replaces the parcel
//! for the issue stage; a refusal leaves it to the core's own decoder. No
//! tracker record is created here.

use tracing::debug;

use crate::common::constants::is_compressed;
use crate::common::error::{XifError, XifResult};
use crate::core::xif::arbiter::XifArbiter;
use crate::core::xif::signals::{CompressedRequest, CompressedResponse, Stage};

impl XifArbiter {
    /// Offers `raw` on the compressed channel.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if `raw` is not a 16-bit encoding or the extension
    /// expands it to something that is not a 32-bit encoding; the latched
    /// fault after an earlier fatal error.
    pub fn offer_compressed(&mut self, raw: u16) -> XifResult<CompressedResponse> {
        self.ensure_running()?;
        if !is_compressed(u32::from(raw)) {
            return self.fail(XifError::ProtocolViolation {
                stage: Stage::Compressed,
                id: None,
                reason: format!("{raw:#06x} is not a 16-bit encoding"),
            });
        }
        if !self.budget.available(Stage::Compressed) {
            self.stats.compressed_stalls += 1;
            return Ok(CompressedResponse::stall());
        }

        let response = self
            .coprocessor
            .compressed(&CompressedRequest { instr: raw });
        if !response.ready {
            self.stats.compressed_stalls += 1;
            return Ok(CompressedResponse::stall());
        }

        self.budget.consume(Stage::Compressed);
        self.stats.compressed_offered += 1;
        if response.accept {
            if is_compressed(response.instr) {
                return self.fail(XifError::ProtocolViolation {
                    stage: Stage::Compressed,
                    id: None,
                    reason: format!(
                        "expansion {:#010x} of {raw:#06x} is not a 32-bit encoding",
                        response.instr
                    ),
                });
            }
            self.stats.compressed_accepted += 1;
            debug!(cycle = self.cycle, raw, expanded = response.instr, "compressed expanded");
            Ok(CompressedResponse::expand(response.instr))
        } else {
            debug!(cycle = self.cycle, raw, "compressed refused");
            Ok(CompressedResponse::refuse())
        }
    }
}
