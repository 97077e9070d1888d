#![deny(missing_docs)]

//! # gstd-masters — Per-ERP Tax-Code Master Tables
//!
//! One immutable master table per target ERP system, behind the
//! [`TaxCodeMaster`] capability trait. The resolver addresses masters only
//! through the trait, so adding a new target system means adding one module
//! here and one [`MasterSet`] arm — no resolver changes.
//!
//! ## Masters
//!
//! | ERP | Module | Coverage |
//! |-----|--------|----------|
//! | SAP ECC | [`sap`] | full (60 key combinations) |
//! | Oracle | [`oracle`] | sparse placeholder (8) |
//! | Dynamics 365 | [`dynamics`] | sparse placeholder (8) |
//!
//! Tables are read-only after construction and safe for concurrent
//! readers without locking.

pub mod dynamics;
pub mod key;
pub mod oracle;
pub mod sap;

pub use dynamics::DynamicsMaster;
pub use key::{
    normalize_rate, CanonicalKey, ChargeCategory, CreditCategory, RegionCategory,
    TransactionCategory,
};
pub use oracle::OracleMaster;
pub use sap::SapEccMaster;

use gstd_core::ErpSystem;

/// Capability trait for a target system's tax-code master.
///
/// A master is a total, immutable mapping from [`CanonicalKey`] to the
/// system's tax code, plus a partial code-description table and the
/// system's union-territory region set.
pub trait TaxCodeMaster: Send + Sync {
    /// The ERP system this master serves.
    fn erp(&self) -> ErpSystem;

    /// Look up the tax code for a canonical key. `None` is not an error —
    /// it is the signal to escalate.
    fn lookup(&self, key: &CanonicalKey) -> Option<&'static str>;

    /// Curated description for a code, if one exists.
    fn describe(&self, code: &str) -> Option<&'static str>;

    /// Whether a two-character region code belongs to this system's
    /// union-territory set.
    fn is_union_territory(&self, region_code: &str) -> bool;

    /// Description for a code, synthesizing a placeholder when no curated
    /// description exists.
    fn describe_or_default(&self, code: &str, rate: &str) -> String {
        match self.describe(code) {
            Some(text) => text.to_string(),
            None => format!("Tax Code {code} - {rate}%"),
        }
    }
}

/// The full set of configured masters, built once at startup and handed
/// to the pipeline explicitly.
#[derive(Debug, Clone)]
pub struct MasterSet {
    sap: SapEccMaster,
    oracle: OracleMaster,
    dynamics: DynamicsMaster,
}

impl MasterSet {
    /// Build all configured masters.
    pub fn new() -> Self {
        Self {
            sap: SapEccMaster::new(),
            oracle: OracleMaster::new(),
            dynamics: DynamicsMaster::new(),
        }
    }

    /// Select the master for an ERP system.
    pub fn master(&self, erp: ErpSystem) -> &dyn TaxCodeMaster {
        match erp {
            ErpSystem::SapEcc => &self.sap,
            ErpSystem::Oracle => &self.oracle,
            ErpSystem::Dynamics365 => &self.dynamics,
        }
    }
}

impl Default for MasterSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_set_selects_by_erp() {
        let masters = MasterSet::new();
        for erp in ErpSystem::all() {
            assert_eq!(masters.master(*erp).erp(), *erp);
        }
    }

    #[test]
    fn all_masters_agree_on_union_territories_today() {
        // Selector-specific sets, identical in content today.
        let masters = MasterSet::new();
        for code in ["04", "07", "25", "26", "31", "34", "35", "38"] {
            for erp in ErpSystem::all() {
                assert!(masters.master(*erp).is_union_territory(code));
            }
        }
    }

    #[test]
    fn sap_covers_more_than_placeholders() {
        let masters = MasterSet::new();
        let key = CanonicalKey::from_parts(
            "18",
            TransactionCategory::Intra,
            ChargeCategory::Rcm,
            CreditCategory::Credit,
            RegionCategory::State,
        );
        assert!(masters.master(ErpSystem::SapEcc).lookup(&key).is_some());
        assert!(masters.master(ErpSystem::Oracle).lookup(&key).is_none());
        assert!(masters.master(ErpSystem::Dynamics365).lookup(&key).is_none());
    }

    #[test]
    fn describe_or_default_prefers_curated_text() {
        let masters = MasterSet::new();
        let sap = masters.master(ErpSystem::SapEcc);
        assert_eq!(sap.describe_or_default("3C", "5"), "CGST-SGST 5% Input");
        assert_eq!(
            sap.describe_or_default("UNKNOWN_CODE", "5"),
            "Tax Code UNKNOWN_CODE - 5%"
        );
    }
}
