//! # Reverse-Charge Evaluation
//!
//! Decides whether liability for remitting tax shifts from the supplier
//! to the recipient. The checks form a fixed-priority short-circuit
//! chain; the ordering is a policy decision, not incidental — vendor
//! registration status is established before any text heuristic runs.

/// The domestic country code; any other supplier country triggers
/// reverse charge.
pub const DOMESTIC_COUNTRY: &str = "IN";

/// Supplier-identifier sentinels denoting an unregistered vendor
/// (compared case-insensitively).
pub const UNREGISTERED_SENTINELS: &[&str] = &["URP", "UNREGISTERED", "NA"];

/// Description keywords for notified reverse-charge service categories
/// (matched as case-insensitive substrings).
pub const RCM_KEYWORDS: &[&str] = &[
    "reverse charge",
    "rcm",
    "gta",
    "legal",
    "advocate",
    "arbitration",
];

/// Evaluate reverse-charge applicability for one line.
///
/// Checks, in order:
/// 1. Foreign vendor: supplier country differs from [`DOMESTIC_COUNTRY`].
/// 2. Unregistered vendor: supplier GSTIN absent or a sentinel value.
/// 3. Notified service: description contains an RCM keyword.
pub fn reverse_charge_applies(
    supplier_gstin: &str,
    supplier_country: &str,
    item_description: &str,
) -> bool {
    if supplier_country != DOMESTIC_COUNTRY {
        tracing::debug!(
            operation = "evaluate_reverse_charge",
            status = "success",
            reason = "foreign_vendor",
            country = %supplier_country,
        );
        return true;
    }

    let gstin = supplier_gstin.trim();
    if gstin.is_empty()
        || UNREGISTERED_SENTINELS
            .iter()
            .any(|s| gstin.eq_ignore_ascii_case(s))
    {
        tracing::debug!(
            operation = "evaluate_reverse_charge",
            status = "success",
            reason = "unregistered_vendor",
        );
        return true;
    }

    let description = item_description.to_lowercase();
    if RCM_KEYWORDS.iter().any(|kw| description.contains(kw)) {
        tracing::debug!(
            operation = "evaluate_reverse_charge",
            status = "success",
            reason = "notified_service",
        );
        return true;
    }

    tracing::debug!(
        operation = "evaluate_reverse_charge",
        status = "success",
        reason = "not_applicable",
    );
    false
}
