//! # Determination Pipeline
//!
//! Runs each line through three strictly ordered stages over one state
//! value — no stage re-entry, no backward edges:
//!
//! ```text
//! LineItem
//!   -> preprocessing      (extraction x2, classification, rate, RCM)
//!   -> determination      (lookup; on miss, generative fallback)
//!   -> validation         (advisory checks)
//!   -> LineResult
//! ```
//!
//! The determination stage is the only suspension point; the pipeline
//! awaits the fallback to completion before validating. Progress messages
//! and errors are ordered-append accumulators threaded through the run.
//!
//! ## Line-boundary recovery
//!
//! Any panic raised within one line's stage sequence is caught at the
//! line boundary and converted to a [`LineResult`] carrying the error
//! sentinel — the batch continues with the next line and always returns a
//! well-formed response.
//!
//! ## Thread Safety
//!
//! The pipeline processes lines through `&mut self` (it owns the
//! determination trail). Build one pipeline at startup and hand it to
//! request handlers behind external synchronisation (e.g.
//! `Arc<Mutex<DeterminationPipeline<_>>>`).

use std::time::Instant;

use futures::FutureExt;

use gstd_core::{ErpSystem, LineItem, LineResult, TokenUsage};
use gstd_masters::{
    CanonicalKey, ChargeCategory, CreditCategory, MasterSet, RegionCategory, TaxCodeMaster,
    TransactionCategory,
};

use crate::batch::{summarize, TaggingRequest, TaggingResponse};
use crate::classify::classify_extracts;
use crate::extract::extract_region_code;
use crate::instructions::InstructionSet;
use crate::rates::aggregate_rate;
use crate::rcm::reverse_charge_applies;
use crate::resolver::{
    resolve_tax_code, EscalationMode, FallbackRequest, GenerativeFallback,
};
use crate::trail::{DeterminationEvent, DeterminationEventType, DeterminationTrail};
use crate::validate::validate_determination;

// ---------------------------------------------------------------------------
// Per-line working state
// ---------------------------------------------------------------------------

/// Working state for one line's pipeline run. Scoped to the run; the only
/// values that leave are the [`LineResult`] fields.
struct DeterminationState {
    supplier_region: String,
    buyer_region: String,
    is_union_territory: bool,
    transaction: TransactionCategory,
    total_rate: f64,
    is_rcm: bool,
    credit_eligible: bool,
    usage: TokenUsage,
    messages: Vec<String>,
    errors: Vec<String>,
}

fn preprocess(line: &LineItem, master: &dyn TaxCodeMaster) -> DeterminationState {
    let mut messages = Vec::new();
    let mut errors = Vec::new();

    let supplier = extract_region_code(&line.supplier_gstin, master);
    if !supplier.is_valid {
        let error = format!(
            "Invalid supplier GSTIN: {}",
            supplier.error.as_deref().unwrap_or("unknown")
        );
        tracing::warn!(supplier = %line.supplier_name, "{error}");
        errors.push(error);
    }
    messages.push(format!("Supplier state: {}", supplier.region_code));

    let buyer = extract_region_code(&line.buyer_gstin, master);
    if !buyer.is_valid {
        let error = format!(
            "Invalid buyer GSTIN: {}",
            buyer.error.as_deref().unwrap_or("unknown")
        );
        tracing::warn!("{error}");
        errors.push(error);
    }
    messages.push(format!("Buyer state: {}", buyer.region_code));

    if supplier.is_union_territory {
        messages.push(format!(
            "State {} is a Union Territory",
            supplier.region_code
        ));
    }

    let classification = classify_extracts(&supplier, &buyer);
    messages.push(format!("Transaction type: {}", classification.transaction));

    let total_rate = aggregate_rate(&line.tax);
    messages.push(format!("Total tax rate: {total_rate}%"));

    let is_rcm = reverse_charge_applies(
        &line.supplier_gstin,
        &line.supplier_country,
        &line.description,
    );
    if is_rcm {
        messages.push("RCM applicable".to_string());
    }

    DeterminationState {
        supplier_region: classification.supplier_region,
        buyer_region: classification.buyer_region,
        is_union_territory: supplier.is_union_territory,
        transaction: classification.transaction,
        total_rate,
        is_rcm,
        credit_eligible: line.credit_eligible,
        usage: TokenUsage::default(),
        messages,
        errors,
    }
}

fn build_key(state: &DeterminationState) -> CanonicalKey {
    let charge = if state.is_rcm {
        ChargeCategory::Rcm
    } else {
        ChargeCategory::Regular
    };
    let credit = if state.credit_eligible {
        CreditCategory::Credit
    } else {
        CreditCategory::NonCredit
    };
    let region = if state.is_union_territory {
        RegionCategory::UnionTerritory
    } else {
        RegionCategory::State
    };
    CanonicalKey::new(state.total_rate, state.transaction, charge, credit, region)
}

/// Textual summary of every computed field plus the raw line, handed to
/// the generative fallback as its context.
fn fallback_context(line: &LineItem, state: &DeterminationState, erp: ErpSystem) -> String {
    let tax_breakdown = line
        .tax
        .iter()
        .map(|entry| format!("{} {}", entry.component, entry.rate))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Item Description: {}\n\
         HSN Code: {}\n\
         Supplier: {} (GSTIN: {})\n\
         Supplier State: {}\n\
         Buyer State: {}\n\
         Transaction Type: {}\n\
         Tax Breakdown: {}\n\
         Total Tax Rate: {}%\n\
         Is Union Territory: {}\n\
         RCM Applicable: {}\n\
         ITC Eligible: {}\n\n\
         Determine the appropriate {} tax code for this transaction.",
        line.description,
        line.hsn,
        line.supplier_name,
        line.supplier_gstin,
        state.supplier_region,
        state.buyer_region,
        state.transaction,
        tax_breakdown,
        state.total_rate,
        state.is_union_territory,
        state.is_rcm,
        state.credit_eligible,
        erp,
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "line processing panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// DeterminationPipeline
// ---------------------------------------------------------------------------

/// The per-batch determination pipeline.
///
/// Owns the master tables, the instruction sets, the fallback
/// collaborator, and the determination trail. Constructed explicitly at
/// startup and passed to callers — there is no process-wide instance.
pub struct DeterminationPipeline<F> {
    masters: MasterSet,
    instructions: InstructionSet,
    fallback: F,
    mode: EscalationMode,
    /// Stage-boundary event trail, exposed for observability export.
    pub trail: DeterminationTrail,
}

impl<F: GenerativeFallback> DeterminationPipeline<F> {
    /// Create a pipeline with the bundled masters and instruction sets.
    pub fn new(fallback: F) -> Self {
        Self {
            masters: MasterSet::new(),
            instructions: InstructionSet::new(),
            fallback,
            mode: EscalationMode::default(),
            trail: DeterminationTrail::default(),
        }
    }

    /// Builder: replace the instruction sets.
    pub fn with_instructions(mut self, instructions: InstructionSet) -> Self {
        self.instructions = instructions;
        self
    }

    /// Builder: set the escalation mode.
    pub fn with_escalation_mode(mut self, mode: EscalationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Access the fallback collaborator.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Process a whole tagging request, line by line in index order.
    ///
    /// Always returns a well-formed response: individual line failures
    /// degrade into sentinel results, never into a batch failure.
    pub async fn process(&mut self, request: &TaggingRequest) -> TaggingResponse {
        tracing::info!(
            erp = %request.erp,
            line_count = request.lines.len(),
            "processing tagging request",
        );

        let mut results = Vec::with_capacity(request.lines.len());
        let mut running_usage = TokenUsage::default();

        for (index, line) in request.lines.iter().enumerate() {
            let result = self.run_line(request.erp, index, line).await;
            running_usage.add(&TokenUsage {
                prompt: result.total_prompt_tokens,
                completion: result.total_completion_tokens,
                reasoning: result.total_reasoning_tokens,
            });
            tracing::debug!(
                line_index = index,
                running_total_tokens = running_usage.total(),
                "line complete",
            );
            results.push(result);
        }

        let summary = summarize(&results);
        tracing::info!(
            total = summary.total_lines,
            successful = summary.successful,
            manual_review = summary.manual_review,
            errors = summary.errors,
            average_confidence = summary.average_confidence,
            "tagging request complete",
        );

        TaggingResponse { results, summary }
    }

    /// Run one line through the full stage sequence, recovering any
    /// failure at the line boundary.
    pub async fn run_line(
        &mut self,
        erp: ErpSystem,
        index: usize,
        line: &LineItem,
    ) -> LineResult {
        self.trail.append(DeterminationEvent::new(
            DeterminationEventType::LineStarted,
            Some(index),
            Some(serde_json::json!({ "erp": erp.as_str() })),
        ));

        let outcome = std::panic::AssertUnwindSafe(self.run_stages(erp, index, line))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(
                    line_index = index,
                    reason = %reason,
                    "line processing failed — continuing with next line",
                );
                self.trail.append(DeterminationEvent::new(
                    DeterminationEventType::LineCompleted,
                    Some(index),
                    Some(serde_json::json!({
                        "status": "pipeline_error",
                        "reason": reason,
                    })),
                ));
                LineResult::pipeline_error(index, line.description.clone(), reason)
            }
        }
    }

    async fn run_stages(&mut self, erp: ErpSystem, index: usize, line: &LineItem) -> LineResult {
        let line_start = Instant::now();

        // Stage 1: preprocessing.
        let stage_start = Instant::now();
        let mut state = preprocess(line, self.masters.master(erp));
        self.trail.append(stage_event(index, "preprocessing", stage_start));

        // Stage 2: determination, the only stage that may suspend.
        let stage_start = Instant::now();
        let key = build_key(&state);
        let instructions = self.instructions.instructions_for(erp);
        let resolution = resolve_tax_code(
            self.masters.master(erp),
            &key,
            self.mode,
            &self.fallback,
            || FallbackRequest {
                erp,
                instructions: instructions.to_string(),
                context: fallback_context(line, &state, erp),
            },
        )
        .await;
        state.messages.extend(resolution.messages);
        state.errors.extend(resolution.errors);
        state.usage.add(&resolution.usage);
        if resolution.escalated {
            self.trail.append(DeterminationEvent::new(
                DeterminationEventType::FallbackInvoked,
                Some(index),
                Some(serde_json::json!({
                    "provenance": resolution.result.provenance.as_str(),
                    "total_tokens": resolution.usage.total(),
                })),
            ));
        }
        self.trail.append(stage_event(index, "determination", stage_start));

        // Stage 3: validation (advisory).
        let stage_start = Instant::now();
        validate_determination(
            state.transaction,
            &resolution.result,
            &mut state.messages,
            &mut state.errors,
        );
        self.trail.append(stage_event(index, "validation", stage_start));

        self.trail.append(DeterminationEvent::new(
            DeterminationEventType::LineCompleted,
            Some(index),
            Some(serde_json::json!({
                "tax_code": resolution.result.tax_code,
                "confidence": resolution.result.confidence,
                "provenance": resolution.result.provenance.as_str(),
                "elapsed_ms": line_start.elapsed().as_millis() as u64,
            })),
        ));

        LineResult {
            line_index: index,
            item_description: line.description.clone(),
            tax_code: resolution.result.tax_code,
            tax_description: resolution.result.tax_description,
            confidence: resolution.result.confidence,
            provenance: resolution.result.provenance,
            total_prompt_tokens: state.usage.prompt,
            total_completion_tokens: state.usage.completion,
            total_reasoning_tokens: state.usage.reasoning,
            total_tokens: state.usage.total(),
            messages: state.messages,
            errors: state.errors,
        }
    }
}

fn stage_event(index: usize, stage: &str, started: Instant) -> DeterminationEvent {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::debug!(line_index = index, stage, elapsed_ms, "stage complete");
    DeterminationEvent::new(
        DeterminationEventType::StageCompleted,
        Some(index),
        Some(serde_json::json!({ "stage": stage, "elapsed_ms": elapsed_ms })),
    )
}

impl<F> std::fmt::Debug for DeterminationPipeline<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterminationPipeline")
            .field("mode", &self.mode)
            .field("trail_events", &self.trail.len())
            .finish()
    }
}
