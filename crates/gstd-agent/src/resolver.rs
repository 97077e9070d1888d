//! # Tax-Code Resolution
//!
//! Performs the O(1) master lookup and, on a miss, escalates to the
//! generative fallback collaborator. A miss is not an error — it is the
//! control-flow signal that the deterministic table cannot answer and a
//! non-deterministic collaborator should try.
//!
//! ## Degradation
//!
//! A failed fallback *call* (transport, API, or contract violation) is
//! recovered locally: the line gets the manual-review sentinel with zero
//! confidence and provenance `fallback_failed`. The sentinel is counted
//! like the pipeline-error sentinel in the batch summary but stays
//! textually distinct for audit.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gstd_core::{
    DeterminationResult, ErpSystem, Provenance, TokenUsage, MANUAL_REVIEW_CODE,
};
use gstd_masters::{CanonicalKey, TaxCodeMaster};

/// Fixed confidence attached to direct master-table hits.
pub const LOOKUP_CONFIDENCE: f64 = 0.95;

// ---------------------------------------------------------------------------
// Fallback collaborator contract
// ---------------------------------------------------------------------------

/// Input to one generative fallback call: the ERP-specific instruction
/// text plus a textual summary of every computed field and the raw line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRequest {
    /// The target system whose nomenclature must be emitted.
    pub erp: ErpSystem,
    /// Opaque instruction text for this target system.
    pub instructions: String,
    /// Line context: computed pipeline fields plus raw invoice fields.
    pub context: String,
}

/// Structured output of a successful generative fallback call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackOutcome {
    /// The proposed tax code.
    pub tax_code: String,
    /// The collaborator's reasoning, reused as the result description.
    pub reasoning: String,
    /// Confidence in [0, 1]. Out-of-range values are clamped on adoption.
    pub confidence: f64,
    /// Provider token accounting; absent counters are zero.
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Failure modes of a fallback invocation.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// The request never produced an HTTP response.
    #[error("fallback transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("fallback API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response arrived but violated the structured-output contract.
    #[error("malformed fallback response: {0}")]
    Malformed(String),
}

/// The generative fallback collaborator.
///
/// Called at most once per line, only when the master lookup misses.
/// Implementations own the transport; the pipeline only depends on this
/// contract.
pub trait GenerativeFallback: Send + Sync {
    /// Determine a tax code for the given request.
    fn determine(
        &self,
        request: &FallbackRequest,
    ) -> impl Future<Output = Result<FallbackOutcome, FallbackError>> + Send;
}

// ---------------------------------------------------------------------------
// Escalation policy
// ---------------------------------------------------------------------------

/// Whether a lookup miss escalates to the generative fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationMode {
    /// Misses escalate to the fallback collaborator (the default).
    Generative,
    /// Misses map directly to the manual-review sentinel; the fallback
    /// is never invoked.
    LookupOnly,
}

impl Default for EscalationMode {
    fn default() -> Self {
        Self::Generative
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Output of the resolution stage for one line.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The determination verdict.
    pub result: DeterminationResult,
    /// Tokens consumed by the fallback call (zero on a lookup hit).
    pub usage: TokenUsage,
    /// Whether the fallback collaborator was invoked.
    pub escalated: bool,
    /// Progress messages produced during resolution.
    pub messages: Vec<String>,
    /// Errors produced during resolution.
    pub errors: Vec<String>,
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Resolve a tax code for a canonical key against one master.
///
/// `make_request` is only invoked on a lookup miss in
/// [`EscalationMode::Generative`]; building the fallback context for
/// lines the table can answer would be wasted work.
pub async fn resolve_tax_code<F, R>(
    master: &dyn TaxCodeMaster,
    key: &CanonicalKey,
    mode: EscalationMode,
    fallback: &F,
    make_request: R,
) -> Resolution
where
    F: GenerativeFallback,
    R: FnOnce() -> FallbackRequest,
{
    let mut messages = Vec::new();
    let mut errors = Vec::new();

    if let Some(code) = master.lookup(key) {
        tracing::info!(
            operation = "lookup_tax_code",
            status = "success",
            erp = %master.erp(),
            code = %code,
        );
        messages.push(format!("Tax code found in master: {code}"));
        return Resolution {
            result: DeterminationResult {
                tax_code: code.to_string(),
                tax_description: master.describe_or_default(code, &key.rate),
                confidence: LOOKUP_CONFIDENCE,
                provenance: Provenance::Lookup,
            },
            usage: TokenUsage::default(),
            escalated: false,
            messages,
            errors,
        };
    }

    tracing::info!(
        operation = "lookup_tax_code",
        status = "failure",
        reason = "not_found",
        erp = %master.erp(),
        key = %key,
    );

    if mode == EscalationMode::LookupOnly {
        messages.push("No direct match - escalation disabled".to_string());
        errors.push(format!("No mapping found: {key}"));
        return Resolution {
            result: DeterminationResult {
                tax_code: MANUAL_REVIEW_CODE.to_string(),
                tax_description: format!("No mapping found: {key}"),
                confidence: 0.0,
                provenance: Provenance::Lookup,
            },
            usage: TokenUsage::default(),
            escalated: false,
            messages,
            errors,
        };
    }

    messages.push("No direct match - using generative fallback".to_string());
    let request = make_request();

    match fallback.determine(&request).await {
        Ok(outcome) => {
            let confidence = clamp_confidence(outcome.confidence);
            tracing::info!(
                operation = "fallback_determination",
                status = "success",
                code = %outcome.tax_code,
                confidence,
            );
            messages.push(format!("Fallback determined tax code: {}", outcome.tax_code));
            Resolution {
                result: DeterminationResult {
                    tax_code: outcome.tax_code,
                    tax_description: outcome.reasoning,
                    confidence,
                    provenance: Provenance::Fallback,
                },
                usage: outcome.usage,
                escalated: true,
                messages,
                errors,
            }
        }
        Err(err) => {
            tracing::error!(
                operation = "fallback_determination",
                status = "failure",
                error = %err,
            );
            errors.push(format!("Fallback error: {err}"));
            Resolution {
                result: DeterminationResult {
                    tax_code: MANUAL_REVIEW_CODE.to_string(),
                    tax_description: "Error in automated determination".to_string(),
                    confidence: 0.0,
                    provenance: Provenance::FallbackFailed,
                },
                usage: TokenUsage::default(),
                escalated: true,
                messages,
                errors,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gstd_masters::{
        ChargeCategory, CreditCategory, MasterSet, RegionCategory, TransactionCategory,
    };

    /// A fallback that always answers with a fixed outcome.
    struct Scripted {
        outcome: FallbackOutcome,
    }

    impl GenerativeFallback for Scripted {
        async fn determine(
            &self,
            _request: &FallbackRequest,
        ) -> Result<FallbackOutcome, FallbackError> {
            Ok(self.outcome.clone())
        }
    }

    /// A fallback that always fails with a transport error.
    struct Unreachable;

    impl GenerativeFallback for Unreachable {
        async fn determine(
            &self,
            _request: &FallbackRequest,
        ) -> Result<FallbackOutcome, FallbackError> {
            Err(FallbackError::Transport("connection refused".to_string()))
        }
    }

    fn request() -> FallbackRequest {
        FallbackRequest {
            erp: ErpSystem::SapEcc,
            instructions: "instructions".to_string(),
            context: "context".to_string(),
        }
    }

    fn key(rate: &str) -> CanonicalKey {
        CanonicalKey::from_parts(
            rate,
            TransactionCategory::Intra,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        )
    }

    #[tokio::test]
    async fn hit_returns_mapped_code_without_escalating() {
        let masters = MasterSet::new();
        let fallback = Unreachable;
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("5"),
            EscalationMode::Generative,
            &fallback,
            request,
        )
        .await;

        assert!(!resolution.escalated);
        assert_eq!(resolution.result.tax_code, "3C");
        assert_eq!(resolution.result.tax_description, "CGST-SGST 5% Input");
        assert_eq!(resolution.result.confidence, LOOKUP_CONFIDENCE);
        assert_eq!(resolution.result.provenance, Provenance::Lookup);
        assert_eq!(resolution.usage, TokenUsage::default());
        assert!(resolution.errors.is_empty());
    }

    #[tokio::test]
    async fn miss_adopts_fallback_outcome() {
        let masters = MasterSet::new();
        let fallback = Scripted {
            outcome: FallbackOutcome {
                tax_code: "3C_CUSTOM".to_string(),
                reasoning: "closest configured intrastate code".to_string(),
                confidence: 0.72,
                usage: TokenUsage {
                    prompt: 840,
                    completion: 60,
                    reasoning: 12,
                },
            },
        };
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("7"),
            EscalationMode::Generative,
            &fallback,
            request,
        )
        .await;

        assert!(resolution.escalated);
        assert_eq!(resolution.result.tax_code, "3C_CUSTOM");
        assert_eq!(resolution.result.provenance, Provenance::Fallback);
        assert_eq!(resolution.result.confidence, 0.72);
        assert_eq!(resolution.usage.prompt, 840);
        assert_eq!(resolution.usage.total(), 912);
    }

    #[tokio::test]
    async fn fallback_confidence_clamped_on_adoption() {
        let masters = MasterSet::new();
        let fallback = Scripted {
            outcome: FallbackOutcome {
                tax_code: "X".to_string(),
                reasoning: "overconfident".to_string(),
                confidence: 1.7,
                usage: TokenUsage::default(),
            },
        };
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("7"),
            EscalationMode::Generative,
            &fallback,
            request,
        )
        .await;
        assert_eq!(resolution.result.confidence, 1.0);
    }

    #[tokio::test]
    async fn failed_fallback_degrades_to_manual_review() {
        let masters = MasterSet::new();
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("7"),
            EscalationMode::Generative,
            &Unreachable,
            request,
        )
        .await;

        assert!(resolution.escalated);
        assert_eq!(resolution.result.tax_code, MANUAL_REVIEW_CODE);
        assert_eq!(resolution.result.confidence, 0.0);
        assert_eq!(resolution.result.provenance, Provenance::FallbackFailed);
        assert_eq!(resolution.errors.len(), 1);
        assert!(resolution.errors[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn lookup_only_mode_never_invokes_fallback() {
        struct Panicking;
        impl GenerativeFallback for Panicking {
            async fn determine(
                &self,
                _request: &FallbackRequest,
            ) -> Result<FallbackOutcome, FallbackError> {
                panic!("fallback must not be called in lookup-only mode");
            }
        }

        let masters = MasterSet::new();
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("7"),
            EscalationMode::LookupOnly,
            &Panicking,
            request,
        )
        .await;

        assert!(!resolution.escalated);
        assert_eq!(resolution.result.tax_code, MANUAL_REVIEW_CODE);
        assert_eq!(resolution.result.provenance, Provenance::Lookup);
        assert!(!resolution.errors.is_empty());
    }

    #[tokio::test]
    async fn lookup_only_hit_still_resolves() {
        let masters = MasterSet::new();
        let resolution = resolve_tax_code(
            masters.master(ErpSystem::SapEcc),
            &key("18"),
            EscalationMode::LookupOnly,
            &Unreachable,
            request,
        )
        .await;
        assert_eq!(resolution.result.tax_code, "3Z");
    }

    #[test]
    fn clamp_confidence_handles_degenerate_values() {
        assert_eq!(clamp_confidence(-0.3), 0.0);
        assert_eq!(clamp_confidence(1.3), 1.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(clamp_confidence(0.8), 0.8);
    }

    #[test]
    fn escalation_mode_default_is_generative() {
        assert_eq!(EscalationMode::default(), EscalationMode::Generative);
    }
}
