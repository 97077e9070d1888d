//! # Advisory Result Validation
//!
//! Post-resolution checks that populate the line's message and error
//! lists for downstream review routing. Validation is strictly advisory:
//! it never vetoes or rewrites the emitted code, even on low confidence
//! or sentinel detection — the error list is the routing signal, the code
//! stands as the engine's best effort.

use gstd_core::{DeterminationResult, ERROR_CODE, MANUAL_REVIEW_CODE};
use gstd_masters::TransactionCategory;

/// Confidence floor below which a determination is flagged for review.
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Run the advisory checks for one resolved line, appending to the
/// line's ordered message and error accumulators.
pub fn validate_determination(
    transaction: TransactionCategory,
    result: &DeterminationResult,
    messages: &mut Vec<String>,
    errors: &mut Vec<String>,
) {
    let errors_before = errors.len();

    if result.confidence < CONFIDENCE_THRESHOLD {
        messages.push(format!("Low confidence: {}", result.confidence));
        errors.push(format!(
            "Confidence below threshold ({CONFIDENCE_THRESHOLD})"
        ));
    }

    let code = result.tax_code.as_str();
    if code == MANUAL_REVIEW_CODE || code == ERROR_CODE || code.is_empty() {
        messages.push("Tax code requires manual review".to_string());
        errors.push("Tax code not automatically determined".to_string());
    }

    // Family cross-check, informational only.
    if transaction == TransactionCategory::Inter && code.starts_with('1') {
        messages.push("IGST tax code matches interstate transaction".to_string());
    } else if transaction == TransactionCategory::Intra
        && (code.starts_with('3') || code.starts_with('R'))
    {
        messages.push("CGST-SGST tax code matches intrastate transaction".to_string());
    }

    if errors.len() == errors_before {
        messages.push("All validations passed".to_string());
        tracing::debug!(operation = "validate_determination", status = "success");
    } else {
        tracing::warn!(
            operation = "validate_determination",
            status = "flagged",
            code = %result.tax_code,
            confidence = result.confidence,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gstd_core::Provenance;

    fn result(code: &str, confidence: f64) -> DeterminationResult {
        DeterminationResult {
            tax_code: code.to_string(),
            tax_description: "test".to_string(),
            confidence,
            provenance: Provenance::Lookup,
        }
    }

    fn run(
        transaction: TransactionCategory,
        result: &DeterminationResult,
    ) -> (Vec<String>, Vec<String>) {
        let mut messages = Vec::new();
        let mut errors = Vec::new();
        validate_determination(transaction, result, &mut messages, &mut errors);
        (messages, errors)
    }

    #[test]
    fn confident_lookup_passes_clean() {
        let (messages, errors) = run(TransactionCategory::Intra, &result("3C", 0.95));
        assert!(errors.is_empty());
        assert!(messages.contains(&"All validations passed".to_string()));
        assert!(messages
            .contains(&"CGST-SGST tax code matches intrastate transaction".to_string()));
    }

    #[test]
    fn low_confidence_flagged_but_code_untouched() {
        let determination = result("3C", 0.4);
        let (_, errors) = run(TransactionCategory::Intra, &determination);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Confidence below threshold"));
        // Advisory only: the determination itself is unchanged.
        assert_eq!(determination.tax_code, "3C");
    }

    #[test]
    fn threshold_is_exclusive() {
        let (_, errors) = run(TransactionCategory::Intra, &result("3C", 0.6));
        assert!(errors.is_empty());
    }

    #[test]
    fn manual_review_sentinel_flagged() {
        let (messages, errors) = run(
            TransactionCategory::Intra,
            &result(MANUAL_REVIEW_CODE, 0.0),
        );
        assert!(errors.contains(&"Tax code not automatically determined".to_string()));
        assert!(messages.contains(&"Tax code requires manual review".to_string()));
        // Low confidence flagged too.
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn error_sentinel_flagged() {
        let (_, errors) = run(TransactionCategory::Unknown, &result(ERROR_CODE, 0.0));
        assert!(errors.contains(&"Tax code not automatically determined".to_string()));
    }

    #[test]
    fn empty_code_flagged() {
        let (_, errors) = run(TransactionCategory::Intra, &result("", 0.9));
        assert!(errors.contains(&"Tax code not automatically determined".to_string()));
    }

    #[test]
    fn igst_family_message_for_interstate() {
        let (messages, _) = run(TransactionCategory::Inter, &result("1Z", 0.95));
        assert!(messages
            .contains(&"IGST tax code matches interstate transaction".to_string()));
    }

    #[test]
    fn rcm_family_message_for_intrastate() {
        let (messages, _) = run(TransactionCategory::Intra, &result("R9", 0.95));
        assert!(messages
            .contains(&"CGST-SGST tax code matches intrastate transaction".to_string()));
    }

    #[test]
    fn no_family_message_on_mismatch() {
        let (messages, errors) = run(TransactionCategory::Inter, &result("3C", 0.95));
        assert!(!messages.iter().any(|m| m.contains("matches")));
        // Mismatch is not an error, just an absent confirmation.
        assert!(errors.is_empty());
    }

    #[test]
    fn errors_append_in_order_after_existing() {
        let mut messages = Vec::new();
        let mut errors = vec!["Invalid supplier GSTIN: upstream".to_string()];
        validate_determination(
            TransactionCategory::Unknown,
            &result(MANUAL_REVIEW_CODE, 0.0),
            &mut messages,
            &mut errors,
        );
        assert_eq!(errors[0], "Invalid supplier GSTIN: upstream");
        assert!(errors.len() > 1);
    }
}
