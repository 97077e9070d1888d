//! # Microsoft Dynamics 365 Tax-Code Master
//!
//! Sparse placeholder master, mirroring the Oracle coverage: standard
//! rates for regular credit-eligible transactions only. Unmapped
//! combinations escalate to the generative fallback.
//!
//! TODO: populate from the Dynamics 365 tax setup once the item sales tax
//! group nomenclature is confirmed.

use std::collections::BTreeMap;

use gstd_core::ErpSystem;

use crate::key::{
    CanonicalKey, ChargeCategory, CreditCategory, RegionCategory, TransactionCategory,
};
use crate::TaxCodeMaster;

/// Union territory state codes, as configured for Dynamics 365 (same set
/// as SAP).
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
        (key("5", Intra), "MS_IN_CGST_SGST_5"),
        (key("12", Intra), "MS_IN_CGST_SGST_12"),
        (key("18", Intra), "MS_IN_CGST_SGST_18"),
        (key("28", Intra), "MS_IN_CGST_SGST_28"),
        (key("5", Inter), "MS_IN_IGST_5"),
        (key("12", Inter), "MS_IN_IGST_12"),
        (key("18", Inter), "MS_IN_IGST_18"),
        (key("28", Inter), "MS_IN_IGST_28"),
    ]
}

fn descriptions() -> Vec<(&'static str, &'static str)> {
    vec![
        ("MS_IN_CGST_SGST_5", "MS 365 CGST-SGST 5% Input"),
        ("MS_IN_CGST_SGST_12", "MS 365 CGST-SGST 12% Input"),
        ("MS_IN_CGST_SGST_18", "MS 365 CGST-SGST 18% Input"),
        ("MS_IN_CGST_SGST_28", "MS 365 CGST-SGST 28% Input"),
        ("MS_IN_IGST_5", "MS 365 IGST 5% Input"),
        ("MS_IN_IGST_12", "MS 365 IGST 12% Input"),
        ("MS_IN_IGST_18", "MS 365 IGST 18% Input"),
        ("MS_IN_IGST_28", "MS 365 IGST 28% Input"),
    ]
}

/// The Dynamics 365 master table.
#[derive(Debug, Clone)]
pub struct DynamicsMaster {
    codes: BTreeMap<CanonicalKey, &'static str>,
    descriptions: BTreeMap<&'static str, &'static str>,
}

impl DynamicsMaster {
    /// Build the master from the configured Dynamics 365 mapping.
    pub fn new() -> Self {
        Self {
            codes: entries().into_iter().collect(),
            descriptions: descriptions().into_iter().collect(),
        }
    }
}

impl Default for DynamicsMaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxCodeMaster for DynamicsMaster {
    fn erp(&self) -> ErpSystem {
        ErpSystem::Dynamics365
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rates_mapped() {
        let master = DynamicsMaster::new();
        let key = CanonicalKey::from_parts(
            "5",
            TransactionCategory::Inter,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        );
        assert_eq!(master.lookup(&key), Some("MS_IN_IGST_5"));
    }

    #[test]
    fn low_rates_not_mapped() {
        let master = DynamicsMaster::new();
        let key = CanonicalKey::from_parts(
            "0.25",
            TransactionCategory::Intra,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        );
        assert_eq!(master.lookup(&key), None);
    }

    #[test]
    fn synthesized_description_for_foreign_code() {
        let master = DynamicsMaster::new();
        assert_eq!(
            master.describe_or_default("MS_IN_CUSTOM_7", "7"),
            "Tax Code MS_IN_CUSTOM_7 - 7%"
        );
    }
}
