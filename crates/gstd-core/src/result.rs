//! # Determination Results
//!
//! Output records of the determination pipeline: the per-line
//! [`DeterminationResult`] and [`LineResult`], the batch-level
//! [`BatchSummary`], and the token accounting shared by both.
//!
//! Two sentinel codes mark lines that need human attention. They are
//! textually distinct for audit purposes but counted identically in the
//! summary's "needs attention" buckets:
//!
//! - [`MANUAL_REVIEW_CODE`] — the engine ran but could not determine a
//!   code (fallback unavailable, or escalation disabled on a lookup miss).
//! - [`ERROR_CODE`] — the line's pipeline run itself failed.

use serde::{Deserialize, Serialize};

/// Sentinel code for lines routed to human review.
pub const MANUAL_REVIEW_CODE: &str = "MANUAL_REVIEW_REQUIRED";

/// Sentinel code for lines whose pipeline run failed.
pub const ERROR_CODE: &str = "ERROR";

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// How a line's tax code was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Direct hit in the ERP master table.
    Lookup,
    /// Determined by the generative fallback collaborator.
    Fallback,
    /// The fallback call itself failed; the manual-review sentinel was
    /// emitted instead.
    FallbackFailed,
    /// The line's pipeline run failed; the error sentinel was emitted.
    PipelineError,
}

impl Provenance {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Fallback => "fallback",
            Self::FallbackFailed => "fallback_failed",
            Self::PipelineError => "pipeline_error",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TokenUsage
// ---------------------------------------------------------------------------

/// Token counters harvested from generative fallback calls.
///
/// Provider metadata may omit any counter; absent fields are 0. The total
/// is always the sum of the three parts — it is computed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt (input) tokens.
    pub prompt: u64,
    /// Completion (output) tokens.
    pub completion: u64,
    /// Reasoning tokens, where the provider reports them separately.
    pub reasoning: u64,
}

impl TokenUsage {
    /// Total tokens: prompt + completion + reasoning.
    pub fn total(&self) -> u64 {
        self.prompt
            .saturating_add(self.completion)
            .saturating_add(self.reasoning)
    }

    /// Accumulate another usage record into this one.
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt = self.prompt.saturating_add(other.prompt);
        self.completion = self.completion.saturating_add(other.completion);
        self.reasoning = self.reasoning.saturating_add(other.reasoning);
    }
}

// ---------------------------------------------------------------------------
// DeterminationResult
// ---------------------------------------------------------------------------

/// The resolver's verdict for one line, before advisory validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminationResult {
    /// The emitted tax code (possibly a sentinel).
    pub tax_code: String,
    /// Human-readable description: the master's description on a lookup
    /// hit, or the fallback's reasoning text.
    pub tax_description: String,
    /// Confidence in [0, 1]. Lookup hits carry a fixed 0.95; sentinel
    /// results carry 0.0.
    pub confidence: f64,
    /// How the code was produced.
    pub provenance: Provenance,
}

// ---------------------------------------------------------------------------
// LineResult
// ---------------------------------------------------------------------------

/// The complete per-line output: determination fields, token accounting,
/// and the ordered progress/error logs accumulated across the stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    /// Zero-based index of the line within the batch.
    pub line_index: usize,
    /// Echo of the submitted item description.
    pub item_description: String,
    /// The emitted tax code (possibly a sentinel).
    pub tax_code: String,
    /// Description or reasoning text for the emitted code.
    pub tax_description: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// How the code was produced.
    pub provenance: Provenance,
    /// Prompt tokens consumed by this line's fallback calls.
    pub total_prompt_tokens: u64,
    /// Completion tokens consumed by this line's fallback calls.
    pub total_completion_tokens: u64,
    /// Reasoning tokens consumed by this line's fallback calls.
    pub total_reasoning_tokens: u64,
    /// Sum of the three token counters.
    pub total_tokens: u64,
    /// Ordered progress messages from all stages.
    pub messages: Vec<String>,
    /// Ordered error strings from all stages. Non-empty whenever the code
    /// is a sentinel or empty.
    pub errors: Vec<String>,
}

impl LineResult {
    /// Construct the degraded result for a line whose pipeline run failed.
    ///
    /// The batch never aborts on a single line: the failure is converted
    /// into the error sentinel with zero confidence and the failure text
    /// recorded, and processing continues with the next line.
    pub fn pipeline_error(
        line_index: usize,
        item_description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        Self {
            line_index,
            item_description: item_description.into(),
            tax_code: ERROR_CODE.to_string(),
            tax_description: format!("Processing error: {reason}"),
            confidence: 0.0,
            provenance: Provenance::PipelineError,
            total_prompt_tokens: 0,
            total_completion_tokens: 0,
            total_reasoning_tokens: 0,
            total_tokens: 0,
            messages: Vec::new(),
            errors: vec![reason],
        }
    }

    /// Whether this line carries a sentinel (or empty) code.
    pub fn needs_attention(&self) -> bool {
        self.tax_code == MANUAL_REVIEW_CODE
            || self.tax_code == ERROR_CODE
            || self.tax_code.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BatchSummary
// ---------------------------------------------------------------------------

/// Batch-level statistics over all line results.
///
/// The three count buckets partition the lines:
/// `successful + manual_review + errors == total_lines`, with
/// manual-review taking precedence when a line's code equals
/// [`MANUAL_REVIEW_CODE`] even if its error list is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of lines in the batch.
    pub total_lines: usize,
    /// Lines with a determined code and no recorded errors.
    pub successful: usize,
    /// Lines carrying the manual-review sentinel.
    pub manual_review: usize,
    /// Lines carrying the error sentinel or a non-empty error list.
    pub errors: usize,
    /// Mean confidence over all lines (including zero-confidence failed
    /// lines), rounded to 3 decimals.
    pub average_confidence: f64,
    /// Aggregate prompt tokens across all lines.
    pub total_prompt_tokens: u64,
    /// Aggregate completion tokens across all lines.
    pub total_completion_tokens: u64,
    /// Aggregate reasoning tokens across all lines.
    pub total_reasoning_tokens: u64,
    /// Aggregate total tokens across all lines.
    pub total_tokens: u64,
}
