//! # Region-Code Extraction
//!
//! Extracts and validates the two-character region code from a raw GSTIN
//! string. Extraction never fails: malformed input produces a
//! [`RegionExtract`] with an empty region code and a
//! reason-distinguishing error message, which downstream classification
//! treats as "cannot classify".

use serde::{Deserialize, Serialize};

use gstd_core::Gstin;
use gstd_masters::TaxCodeMaster;

/// Result of region-code extraction for one party's GSTIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionExtract {
    /// Two-character region code, empty when invalid.
    pub region_code: String,
    /// Whether the GSTIN passed format validation.
    pub is_valid: bool,
    /// Whether the region belongs to the selected system's
    /// union-territory set.
    pub is_union_territory: bool,
    /// Error text when invalid (`None` on success).
    pub error: Option<String>,
}

/// Extract the region code from a raw GSTIN string.
///
/// The master selects which union-territory set is consulted; it has no
/// effect on format validation itself.
pub fn extract_region_code(gstin: &str, master: &dyn TaxCodeMaster) -> RegionExtract {
    match Gstin::new(gstin) {
        Ok(parsed) => {
            let region = parsed.region_code();
            tracing::debug!(
                operation = "extract_region_code",
                status = "success",
                region = %region,
            );
            RegionExtract {
                region_code: region.to_string(),
                is_valid: true,
                is_union_territory: master.is_union_territory(region),
                error: None,
            }
        }
        Err(err) => {
            tracing::debug!(
                operation = "extract_region_code",
                status = "failure",
                reason = err.reason(),
            );
            RegionExtract {
                region_code: String::new(),
                is_valid: false,
                is_union_territory: false,
                error: Some(err.to_string()),
            }
        }
    }
}
