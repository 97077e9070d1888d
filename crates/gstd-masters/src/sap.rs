//! # SAP ECC Tax-Code Master
//!
//! The fully populated master: every supported combination of rate,
//! transaction category, charge category, credit category, and region
//! category maps to a SAP ECC tax code.
//!
//! Code families:
//!
//! | Family | Meaning |
//! |--------|---------|
//! | `3*`   | Intrastate CGST-SGST (`_UT` variants for CGST-UGST) |
//! | `1*`   | Interstate IGST (shared between states and UTs) |
//! | `R*`   | Reverse charge |
//! | `*_NC` | Input credit blocked |
//! | `Z0`   | Zero rated / exempt |
//!
//! Not every code carries a curated description — `_NC` and `_UT_NC`
//! variants fall through to the synthesized description.

use std::collections::BTreeMap;

use gstd_core::ErpSystem;

use crate::key::{
    CanonicalKey, ChargeCategory, CreditCategory, RegionCategory, TransactionCategory,
};
use crate::TaxCodeMaster;

/// Union territory state codes, as configured for SAP ECC.
const UNION_TERRITORIES: &[&str] = &["04", "07", "25", "26", "31", "34", "35", "38"];

fn key(
    rate: &str,
    transaction: TransactionCategory,
    charge: ChargeCategory,
    credit: CreditCategory,
    region: RegionCategory,
) -> CanonicalKey {
    CanonicalKey::from_parts(rate, transaction, charge, credit, region)
}

fn entries() -> Vec<(CanonicalKey, &'static str)> {
    use ChargeCategory::{Rcm, Regular};
    use CreditCategory::{Credit, NonCredit};
    use RegionCategory::{State, UnionTerritory};
    use TransactionCategory::{Inter, Intra};

    vec![
        // Intrastate CGST-SGST (regular states)
        (key("0.25", Intra, Regular, Credit, State), "3A"),
        (key("3", Intra, Regular, Credit, State), "3B"),
        (key("5", Intra, Regular, Credit, State), "3C"),
        (key("12", Intra, Regular, Credit, State), "3X"),
        (key("18", Intra, Regular, Credit, State), "3Z"),
        (key("28", Intra, Regular, Credit, State), "3Y"),
        // Intrastate CGST-UGST (union territories)
        (key("0.25", Intra, Regular, Credit, UnionTerritory), "3A_UT"),
        (key("3", Intra, Regular, Credit, UnionTerritory), "3B_UT"),
        (key("5", Intra, Regular, Credit, UnionTerritory), "3C_UT"),
        (key("12", Intra, Regular, Credit, UnionTerritory), "3X_UT"),
        (key("18", Intra, Regular, Credit, UnionTerritory), "3Z_UT"),
        (key("28", Intra, Regular, Credit, UnionTerritory), "3Y_UT"),
        // Interstate IGST (same code for states and UTs)
        (key("0.25", Inter, Regular, Credit, State), "1A"),
        (key("0.25", Inter, Regular, Credit, UnionTerritory), "1A"),
        (key("3", Inter, Regular, Credit, State), "1B"),
        (key("3", Inter, Regular, Credit, UnionTerritory), "1B"),
        (key("5", Inter, Regular, Credit, State), "1C"),
        (key("5", Inter, Regular, Credit, UnionTerritory), "1C"),
        (key("12", Inter, Regular, Credit, State), "1X"),
        (key("12", Inter, Regular, Credit, UnionTerritory), "1X"),
        (key("18", Inter, Regular, Credit, State), "1Z"),
        (key("18", Inter, Regular, Credit, UnionTerritory), "1Z"),
        (key("28", Inter, Regular, Credit, State), "1Y"),
        (key("28", Inter, Regular, Credit, UnionTerritory), "1Y"),
        // Non-credit, intrastate
        (key("5", Intra, Regular, NonCredit, State), "3C_NC"),
        (key("5", Intra, Regular, NonCredit, UnionTerritory), "3C_UT_NC"),
        (key("12", Intra, Regular, NonCredit, State), "3X_NC"),
        (key("12", Intra, Regular, NonCredit, UnionTerritory), "3X_UT_NC"),
        (key("18", Intra, Regular, NonCredit, State), "3Z_NC"),
        (key("18", Intra, Regular, NonCredit, UnionTerritory), "3Z_UT_NC"),
        (key("28", Intra, Regular, NonCredit, State), "3Y_NC"),
        (key("28", Intra, Regular, NonCredit, UnionTerritory), "3Y_UT_NC"),
        // Non-credit, interstate
        (key("5", Inter, Regular, NonCredit, State), "1C_NC"),
        (key("5", Inter, Regular, NonCredit, UnionTerritory), "1C_NC"),
        (key("12", Inter, Regular, NonCredit, State), "1X_NC"),
        (key("12", Inter, Regular, NonCredit, UnionTerritory), "1X_NC"),
        (key("18", Inter, Regular, NonCredit, State), "1Z_NC"),
        (key("18", Inter, Regular, NonCredit, UnionTerritory), "1Z_NC"),
        (key("28", Inter, Regular, NonCredit, State), "1Y_NC"),
        (key("28", Inter, Regular, NonCredit, UnionTerritory), "1Y_NC"),
        // Reverse charge, intrastate
        (key("5", Intra, Rcm, Credit, State), "R3"),
        (key("5", Intra, Rcm, Credit, UnionTerritory), "R3_UT"),
        (key("12", Intra, Rcm, Credit, State), "R6"),
        (key("12", Intra, Rcm, Credit, UnionTerritory), "R6_UT"),
        (key("18", Intra, Rcm, Credit, State), "R9"),
        (key("18", Intra, Rcm, Credit, UnionTerritory), "R9_UT"),
        (key("28", Intra, Rcm, Credit, State), "R12"),
        (key("28", Intra, Rcm, Credit, UnionTerritory), "R12_UT"),
        // Reverse charge, interstate
        (key("5", Inter, Rcm, Credit, State), "R1"),
        (key("5", Inter, Rcm, Credit, UnionTerritory), "R1"),
        (key("12", Inter, Rcm, Credit, State), "R4"),
        (key("12", Inter, Rcm, Credit, UnionTerritory), "R4"),
        (key("18", Inter, Rcm, Credit, State), "R7"),
        (key("18", Inter, Rcm, Credit, UnionTerritory), "R7"),
        (key("28", Inter, Rcm, Credit, State), "R10"),
        (key("28", Inter, Rcm, Credit, UnionTerritory), "R10"),
        // Reverse charge, non-credit, intrastate
        (key("5", Intra, Rcm, NonCredit, State), "R3_NC"),
        (key("5", Intra, Rcm, NonCredit, UnionTerritory), "R3_UT_NC"),
        (key("12", Intra, Rcm, NonCredit, State), "R6_NC"),
        (key("12", Intra, Rcm, NonCredit, UnionTerritory), "R6_UT_NC"),
        (key("18", Intra, Rcm, NonCredit, State), "R9_NC"),
        (key("18", Intra, Rcm, NonCredit, UnionTerritory), "R9_UT_NC"),
        (key("28", Intra, Rcm, NonCredit, State), "R12_NC"),
        (key("28", Intra, Rcm, NonCredit, UnionTerritory), "R12_UT_NC"),
        // Reverse charge, non-credit, interstate
        (key("5", Inter, Rcm, NonCredit, State), "R1_NC"),
        (key("5", Inter, Rcm, NonCredit, UnionTerritory), "R1_NC"),
        (key("12", Inter, Rcm, NonCredit, State), "R4_NC"),
        (key("12", Inter, Rcm, NonCredit, UnionTerritory), "R4_NC"),
        (key("18", Inter, Rcm, NonCredit, State), "R7_NC"),
        (key("18", Inter, Rcm, NonCredit, UnionTerritory), "R7_NC"),
        (key("28", Inter, Rcm, NonCredit, State), "R10_NC"),
        (key("28", Inter, Rcm, NonCredit, UnionTerritory), "R10_NC"),
        // Zero rated / exempt
        (key("0", Intra, Regular, Credit, State), "Z0"),
        (key("0", Intra, Regular, Credit, UnionTerritory), "Z0"),
        (key("0", Inter, Regular, Credit, State), "Z0"),
        (key("0", Inter, Regular, Credit, UnionTerritory), "Z0"),
    ]
}

fn descriptions() -> Vec<(&'static str, &'static str)> {
    vec![
        ("3A", "CGST-SGST 0.25% Input"),
        ("3B", "CGST-SGST 3% Input"),
        ("3C", "CGST-SGST 5% Input"),
        ("3X", "CGST-SGST 12% Input"),
        ("3Z", "CGST-SGST 18% Input"),
        ("3Y", "CGST-SGST 28% Input"),
        ("3A_UT", "CGST-UGST 0.25% Input"),
        ("3B_UT", "CGST-UGST 3% Input"),
        ("3C_UT", "CGST-UGST 5% Input"),
        ("3X_UT", "CGST-UGST 12% Input"),
        ("3Z_UT", "CGST-UGST 18% Input"),
        ("3Y_UT", "CGST-UGST 28% Input"),
        ("1A", "IGST 0.25% Input"),
        ("1B", "IGST 3% Input"),
        ("1C", "IGST 5% Input"),
        ("1X", "IGST 12% Input"),
        ("1Z", "IGST 18% Input"),
        ("1Y", "IGST 28% Input"),
        ("3C_NC", "CGST-SGST 5% Non-Credit"),
        ("3X_NC", "CGST-SGST 12% Non-Credit"),
        ("3Z_NC", "CGST-SGST 18% Non-Credit"),
        ("3Y_NC", "CGST-SGST 28% Non-Credit"),
        ("R3", "RCM CGST-SGST 5% Input"),
        ("R6", "RCM CGST-SGST 12% Input"),
        ("R9", "RCM CGST-SGST 18% Input"),
        ("R12", "RCM CGST-SGST 28% Input"),
        ("R1", "RCM IGST 5% Input"),
        ("R4", "RCM IGST 12% Input"),
        ("R7", "RCM IGST 18% Input"),
        ("R10", "RCM IGST 28% Input"),
        ("Z0", "Input Tax Exempt / Zero Rated"),
    ]
}

/// The SAP ECC master table.
#[derive(Debug, Clone)]
pub struct SapEccMaster {
    codes: BTreeMap<CanonicalKey, &'static str>,
    descriptions: BTreeMap<&'static str, &'static str>,
}

impl SapEccMaster {
    /// Build the master from the configured SAP ECC mapping.
    pub fn new() -> Self {
        Self {
            codes: entries().into_iter().collect(),
            descriptions: descriptions().into_iter().collect(),
        }
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table is empty (never, for this master).
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for SapEccMaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxCodeMaster for SapEccMaster {
    fn erp(&self) -> ErpSystem {
        ErpSystem::SapEcc
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

    fn k(
        rate: &str,
        transaction: TransactionCategory,
        charge: ChargeCategory,
        credit: CreditCategory,
        region: RegionCategory,
    ) -> CanonicalKey {
        CanonicalKey::from_parts(rate, transaction, charge, credit, region)
    }

    #[test]
    fn standard_intrastate_lookup() {
        let master = SapEccMaster::new();
        let code = master.lookup(&k(
            "5",
            TransactionCategory::Intra,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        ));
        assert_eq!(code, Some("3C"));
    }

    #[test]
    fn union_territory_takes_ut_family() {
        let master = SapEccMaster::new();
        let code = master.lookup(&k(
            "18",
            TransactionCategory::Intra,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::UnionTerritory,
        ));
        assert_eq!(code, Some("3Z_UT"));
    }

    #[test]
    fn interstate_shares_code_across_region_categories() {
        let master = SapEccMaster::new();
        let state = master.lookup(&k(
            "12",
            TransactionCategory::Inter,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        ));
        let ut = master.lookup(&k(
            "12",
            TransactionCategory::Inter,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::UnionTerritory,
        ));
        assert_eq!(state, Some("1X"));
        assert_eq!(ut, Some("1X"));
    }

    #[test]
    fn rcm_lookup() {
        let master = SapEccMaster::new();
        let code = master.lookup(&k(
            "18",
            TransactionCategory::Intra,
            ChargeCategory::Rcm,
            CreditCategory::Credit,
            RegionCategory::State,
        ));
        assert_eq!(code, Some("R9"));
    }

    #[test]
    fn zero_rated_maps_everywhere() {
        let master = SapEccMaster::new();
        for transaction in [TransactionCategory::Intra, TransactionCategory::Inter] {
            for region in [RegionCategory::State, RegionCategory::UnionTerritory] {
                let code = master.lookup(&k(
                    "0",
                    transaction,
                    ChargeCategory::Regular,
                    CreditCategory::Credit,
                    region,
                ));
                assert_eq!(code, Some("Z0"));
            }
        }
    }

    #[test]
    fn unsupported_rate_misses() {
        let master = SapEccMaster::new();
        let code = master.lookup(&k(
            "7",
            TransactionCategory::Intra,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        ));
        assert_eq!(code, None);
    }

    #[test]
    fn unknown_category_never_mapped() {
        let master = SapEccMaster::new();
        for (key, _) in entries() {
            assert_ne!(key.transaction, TransactionCategory::Unknown);
        }
        let code = master.lookup(&k(
            "18",
            TransactionCategory::Unknown,
            ChargeCategory::Regular,
            CreditCategory::Credit,
            RegionCategory::State,
        ));
        assert_eq!(code, None);
    }

    #[test]
    fn every_mapped_code_describable() {
        let master = SapEccMaster::new();
        for (key, code) in entries() {
            // Curated description or the synthesized form.
            let text = master.describe_or_default(code, &key.rate);
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn nc_variants_synthesize_description() {
        let master = SapEccMaster::new();
        assert!(master.describe("3C_UT_NC").is_none());
        assert_eq!(
            master.describe_or_default("3C_UT_NC", "5"),
            "Tax Code 3C_UT_NC - 5%"
        );
    }

    #[test]
    fn union_territory_membership() {
        let master = SapEccMaster::new();
        assert!(master.is_union_territory("04"));
        assert!(master.is_union_territory("35"));
        assert!(!master.is_union_territory("27"));
        assert!(!master.is_union_territory("29"));
    }

    #[test]
    fn table_size_matches_configuration() {
        // 60 distinct key combinations (IGST rows share codes but not keys).
        let master = SapEccMaster::new();
        assert_eq!(master.len(), entries().len());
        assert!(!master.is_empty());
    }
}
