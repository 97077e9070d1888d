//! # Oracle ERP Tax-Code Master
//!
//! Sparse placeholder master: only the four standard rates for regular
//! credit-eligible transactions are mapped. Everything else — RCM,
//! non-credit, union-territory variants, 0.25%/3%/0% rates — misses and
//! escalates to the generative fallback.
//!
//! TODO: populate from the Oracle tax configuration once the nomenclature
//! is confirmed with the Oracle integration team.

use std::collections::BTreeMap;

use gstd_core::ErpSystem;

use crate::key::{
    CanonicalKey, ChargeCategory, CreditCategory, RegionCategory, TransactionCategory,
};
use crate::TaxCodeMaster;

/// Union territory state codes, as configured for Oracle (same set as SAP).
const UNION_TERRITORIES: &[&str] = &["04", "07", "25", "26", "31", "34", "35", "38"];

fn entries() -> Vec<(CanonicalKey, &'static str)> {
    use ChargeCategory::Regular;
    use CreditCategory::Credit;
    use RegionCategory::State;
    use TransactionCategory::{Inter, Intra};

    let key = |rate, transaction| {
        CanonicalKey::from_parts(rate, transaction, Regular, Credit, State)
    };

    vec![
        (key("5", Intra), "ORA_CGST_SGST_5"),
        (key("12", Intra), "ORA_CGST_SGST_12"),
        (key("18", Intra), "ORA_CGST_SGST_18"),
        (key("28", Intra), "ORA_CGST_SGST_28"),
        (key("5", Inter), "ORA_IGST_5"),
        (key("12", Inter), "ORA_IGST_12"),
        (key("18", Inter), "ORA_IGST_18"),
        (key("28", Inter), "ORA_IGST_28"),
    ]
}

fn descriptions() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ORA_CGST_SGST_5", "Oracle CGST-SGST 5% Input"),
        ("ORA_CGST_SGST_12", "Oracle CGST-SGST 12% Input"),
        ("ORA_CGST_SGST_18", "Oracle CGST-SGST 18% Input"),
        ("ORA_CGST_SGST_28", "Oracle CGST-SGST 28% Input"),
        ("ORA_IGST_5", "Oracle IGST 5% Input"),
        ("ORA_IGST_12", "Oracle IGST 12% Input"),
        ("ORA_IGST_18", "Oracle IGST 18% Input"),
        ("ORA_IGST_28", "Oracle IGST 28% Input"),
    ]
}

/// The Oracle ERP master table.
#[derive(Debug, Clone)]
pub struct OracleMaster {
    codes: BTreeMap<CanonicalKey, &'static str>,
    descriptions: BTreeMap<&'static str, &'static str>,
}

impl OracleMaster {
    /// Build the master from the configured Oracle mapping.
    pub fn new() -> Self {
        Self {
            codes: entries().into_iter().collect(),
            descriptions: descriptions().into_iter().collect(),
        }
    }
}

impl Default for OracleMaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxCodeMaster for OracleMaster {
    fn erp(&self) -> ErpSystem {
        ErpSystem::Oracle
    }

    fn lookup(&self, key: &CanonicalKey) -> Option<&'static str> {
        self.codes.get(key).copied()
    }

    fn describe(&self, code: &str) -> Option<&'static str> {
        self.descriptions.get(code).copied()
    }

    fn is_union_territory(&self, region_code: &str) -> bool {
        UNION_TERRITORIES.contains(&region_code)
    }
}
