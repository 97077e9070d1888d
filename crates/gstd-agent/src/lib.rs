//! # gstd-agent — The Tax-Code Determination Pipeline
//!
//! Determines the correct tax code for invoice line items under the
//! multi-jurisdiction GST regime, per target ERP system.
//!
//! ## Pipeline
//!
//! Each line runs through three strictly ordered stages over one state
//! value:
//!
//! 1. **Preprocessing** — GSTIN region extraction for both parties,
//!    transaction classification, rate aggregation, reverse-charge
//!    evaluation.
//! 2. **Determination** — canonical-key lookup against the selected ERP
//!    master; on a miss, escalation to the generative fallback
//!    collaborator. The only suspension point.
//! 3. **Validation** — advisory confidence, sentinel, and code-family
//!    checks that populate the error list without ever changing the code.
//!
//! ## Degradation semantics
//!
//! A batch is never aborted by one line: identifier failures surface as
//! messages, a failed fallback call becomes the manual-review sentinel,
//! and any panic inside a line's run is caught at the line boundary and
//! becomes the error sentinel. Every request returns a well-formed
//! response with a [`batch::summarize`] summary whose three count buckets
//! partition the lines.

pub mod batch;
pub mod classify;
pub mod extract;
pub mod instructions;
pub mod pipeline;
pub mod rates;
pub mod rcm;
pub mod resolver;
pub mod trail;
pub mod validate;

// Re-export primary types.
pub use batch::{summarize, TaggingRequest, TaggingResponse};
pub use instructions::InstructionSet;
pub use pipeline::DeterminationPipeline;
pub use resolver::{
    EscalationMode, FallbackError, FallbackOutcome, FallbackRequest, GenerativeFallback,
};
pub use trail::{DeterminationEvent, DeterminationEventType, DeterminationTrail};
