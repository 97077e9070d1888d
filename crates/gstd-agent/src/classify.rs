//! # Transaction Classification
//!
//! Classifies a transaction as intra- or inter-regional by comparing the
//! supplier's and buyer's region codes. If either GSTIN is invalid the
//! classification is `UNKNOWN` — callers must treat that as "cannot
//! classify", not as a third legitimate category: no master table carries
//! `UNKNOWN` keys, so such lines always escalate.

use serde::{Deserialize, Serialize};

use gstd_masters::{TaxCodeMaster, TransactionCategory};

use crate::extract::{extract_region_code, RegionExtract};

/// Result of transaction classification.
///
/// The region codes are positional: swapping the two input GSTINs
/// preserves the category but swaps which code is reported as supplier
/// vs buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// INTRA, INTER, or UNKNOWN.
    pub transaction: TransactionCategory,
    /// Supplier region code (possibly empty when invalid).
    pub supplier_region: String,
    /// Buyer region code (possibly empty when invalid).
    pub buyer_region: String,
    /// Whether both parties are registered in the same region. Always
    /// false for UNKNOWN.
    pub is_same_region: bool,
}

/// Classify a transaction from the two parties' raw GSTIN strings.
pub fn classify_transaction(
    supplier_gstin: &str,
    buyer_gstin: &str,
    master: &dyn TaxCodeMaster,
) -> Classification {
    let supplier = extract_region_code(supplier_gstin, master);
    let buyer = extract_region_code(buyer_gstin, master);
    classify_extracts(&supplier, &buyer)
}

/// Classify a transaction from already-performed region extractions.
///
/// The pipeline extracts each party's region once and reuses the results
/// here rather than re-validating the GSTINs.
pub fn classify_extracts(supplier: &RegionExtract, buyer: &RegionExtract) -> Classification {
    if !supplier.is_valid || !buyer.is_valid {
        tracing::debug!(
            operation = "classify_transaction",
            status = "failure",
            reason = "invalid_gstin",
        );
        return Classification {
            transaction: TransactionCategory::Unknown,
            supplier_region: supplier.region_code.clone(),
            buyer_region: buyer.region_code.clone(),
            is_same_region: false,
        };
    }

    let is_same = supplier.region_code == buyer.region_code;
    let transaction = if is_same {
        TransactionCategory::Intra
    } else {
        TransactionCategory::Inter
    };

    tracing::debug!(
        operation = "classify_transaction",
        status = "success",
        transaction = %transaction,
    );

    Classification {
        transaction,
        supplier_region: supplier.region_code.clone(),
        buyer_region: buyer.region_code.clone(),
        is_same_region: is_same,
    }
}
