//! # Batch Request/Response and Summary Arithmetic
//!
//! The batch interface: an ordered list of line items with one ERP
//! selector in, an ordered list of line results plus one summary out.
//!
//! ## Bucket arithmetic
//!
//! Every line lands in exactly one summary bucket, so
//! `successful + manual_review + errors == total_lines` always holds.
//! Manual review takes precedence: a line carrying the manual-review
//! sentinel counts there even when its error list is non-empty.

use serde::{Deserialize, Serialize};

use gstd_core::{
    BatchSummary, ErpSystem, LineItem, LineResult, TokenUsage, ERROR_CODE, MANUAL_REVIEW_CODE,
};

/// A batch tagging request: one ERP selector, many ordered line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggingRequest {
    /// Target ERP system; defaults to SAP ECC when absent on the wire.
    #[serde(default)]
    pub erp: ErpSystem,
    /// Ordered invoice lines.
    pub lines: Vec<LineItem>,
}

impl TaggingRequest {
    /// Create a request.
    pub fn new(erp: ErpSystem, lines: Vec<LineItem>) -> Self {
        Self { erp, lines }
    }
}

/// A batch tagging response: per-line results plus the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggingResponse {
    /// Ordered per-line results, index-aligned with the request.
    pub results: Vec<LineResult>,
    /// Batch-level statistics.
    pub summary: BatchSummary,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Compute the batch summary over all line results.
///
/// Average confidence includes zero-confidence failed lines; an empty
/// batch reports 0.0. Token totals are per-counter sums.
pub fn summarize(results: &[LineResult]) -> BatchSummary {
    let total_lines = results.len();
    let mut successful = 0;
    let mut manual_review = 0;
    let mut errors = 0;
    let mut confidence_sum = 0.0;
    let mut usage = TokenUsage::default();

    for result in results {
        confidence_sum += result.confidence;
        usage.add(&TokenUsage {
            prompt: result.total_prompt_tokens,
            completion: result.total_completion_tokens,
            reasoning: result.total_reasoning_tokens,
        });

        if result.tax_code == MANUAL_REVIEW_CODE {
            manual_review += 1;
        } else if result.tax_code == ERROR_CODE || !result.errors.is_empty() {
            errors += 1;
        } else {
            successful += 1;
        }
    }

    let average_confidence = if total_lines == 0 {
        0.0
    } else {
        round3(confidence_sum / total_lines as f64)
    };

    BatchSummary {
        total_lines,
        successful,
        manual_review,
        errors,
        average_confidence,
        total_prompt_tokens: usage.prompt,
        total_completion_tokens: usage.completion,
        total_reasoning_tokens: usage.reasoning,
        total_tokens: usage.total(),
    }
}
