//! # Canonical Lookup Key
//!
//! The normalized 5-tuple that indexes every ERP master table:
//! (rate, transaction category, charge category, credit category, region
//! category). Master tables are keyed by value equality, so the rate
//! component must be rendered deterministically — `18`, `18.0`, and
//! `18.00` all canonicalize to `"18"`.
//!
//! ## Determinism
//!
//! [`normalize_rate`] is injective over the supported GST rate set
//! {0, 0.25, 3, 5, 12, 18, 28}: distinct supported rates never collide,
//! and the same rate always renders to the same string. Tables live in
//! `BTreeMap`s, so iteration order is deterministic as well.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category enums
// ---------------------------------------------------------------------------

/// Whether supplier and buyer are registered in the same region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TransactionCategory {
    /// Same region: CGST + SGST (or UGST) applies.
    #[serde(rename = "INTRA")]
    Intra,
    /// Different regions: IGST applies.
    #[serde(rename = "INTER")]
    Inter,
    /// Could not classify (at least one party's GSTIN is invalid).
    /// No master table carries keys for this category — a lookup with it
    /// always misses and escalates.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl TransactionCategory {
    /// Return the wire value of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intra => "INTRA",
            Self::Inter => "INTER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether tax liability sits with the supplier or shifts to the recipient.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ChargeCategory {
    /// Forward charge: the supplier remits.
    #[serde(rename = "REGULAR")]
    Regular,
    /// Reverse charge: the recipient remits.
    #[serde(rename = "RCM")]
    Rcm,
}

impl ChargeCategory {
    /// Return the wire value of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Rcm => "RCM",
        }
    }
}

impl std::fmt::Display for ChargeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the recipient may offset the tax as an input credit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CreditCategory {
    /// Input tax credit available.
    #[serde(rename = "CREDIT")]
    Credit,
    /// Credit blocked.
    #[serde(rename = "NON_CREDIT")]
    NonCredit,
}

impl CreditCategory {
    /// Return the wire value of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::NonCredit => "NON_CREDIT",
        }
    }
}

impl std::fmt::Display for CreditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the supplier's region is an ordinary state or a union
/// territory (which takes a distinct tax-code family for intra-region
/// transactions).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RegionCategory {
    /// Ordinary administrative state.
    #[serde(rename = "STATE")]
    State,
    /// Union territory.
    #[serde(rename = "UT")]
    UnionTerritory,
}

impl RegionCategory {
    /// Return the wire value of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "STATE",
            Self::UnionTerritory => "UT",
        }
    }
}

impl std::fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rate normalization
// ---------------------------------------------------------------------------

/// Render a tax rate as its canonical string form: decimal rendering with
/// trailing zeros and a dangling decimal point stripped.
///
/// `18.0` → `"18"`, `0.25` → `"0.25"`, `0.0` → `"0"`, `5.50` → `"5.5"`.
pub fn normalize_rate(rate: f64) -> String {
    let rendered = format!("{rate}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

// ---------------------------------------------------------------------------
// CanonicalKey
// ---------------------------------------------------------------------------

/// The normalized 5-tuple indexing an ERP master table.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CanonicalKey {
    /// Canonical rate string (see [`normalize_rate`]).
    pub rate: String,
    /// Intra- vs inter-region.
    pub transaction: TransactionCategory,
    /// Forward vs reverse charge.
    pub charge: ChargeCategory,
    /// Input-credit eligibility.
    pub credit: CreditCategory,
    /// State vs union territory.
    pub region: RegionCategory,
}

impl CanonicalKey {
    /// Build a key from a numeric total rate, normalizing the rate string.
    pub fn new(
        rate: f64,
        transaction: TransactionCategory,
        charge: ChargeCategory,
        credit: CreditCategory,
        region: RegionCategory,
    ) -> Self {
        Self {
            rate: normalize_rate(rate),
            transaction,
            charge,
            credit,
            region,
        }
    }

    /// Build a key from an already-canonical rate string. Used by the
    /// master table definitions, where rates are written canonically.
    pub fn from_parts(
        rate: &str,
        transaction: TransactionCategory,
        charge: ChargeCategory,
        credit: CreditCategory,
        region: RegionCategory,
    ) -> Self {
        Self {
            rate: rate.to_string(),
            transaction,
            charge,
            credit,
            region,
        }
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rate={}%, type={}, charge={}, credit={}, region={}",
            self.rate, self.transaction, self.charge, self.credit, self.region
        )
    }
}
