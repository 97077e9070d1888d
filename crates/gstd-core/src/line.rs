//! # Invoice Line-Item Input Model
//!
//! The input records submitted for tax-code determination: one
//! [`LineItem`] per invoice line, each carrying its supplier/buyer
//! registration data and the invoice's tax component breakdown, plus the
//! [`ErpSystem`] selector that decides which tax-code nomenclature the
//! engine must emit.
//!
//! Line items are immutable once submitted — the pipeline reads them and
//! writes its own state, never back into the request.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// ErpSystem
// ---------------------------------------------------------------------------

/// The downstream enterprise system whose tax-code nomenclature the
/// resolver must emit.
///
/// Each system carries its own master table and its own generative
/// instruction set. `SapEcc` is the canonical default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErpSystem {
    /// SAP ECC — the fully populated master.
    #[serde(rename = "SAP_ECC")]
    SapEcc,
    /// Oracle ERP — sparse placeholder master.
    #[serde(rename = "ORACLE")]
    Oracle,
    /// Microsoft Dynamics 365 — sparse placeholder master.
    #[serde(rename = "MS_365")]
    Dynamics365,
}

impl ErpSystem {
    /// Return the wire value of this selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SapEcc => "SAP_ECC",
            Self::Oracle => "ORACLE",
            Self::Dynamics365 => "MS_365",
        }
    }

    /// Return all ERP system variants.
    pub fn all() -> &'static [ErpSystem] {
        &[Self::SapEcc, Self::Oracle, Self::Dynamics365]
    }
}

impl Default for ErpSystem {
    fn default() -> Self {
        Self::SapEcc
    }
}

impl std::fmt::Display for ErpSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErpSystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAP_ECC" => Ok(Self::SapEcc),
            "ORACLE" => Ok(Self::Oracle),
            "MS_365" => Ok(Self::Dynamics365),
            other => Err(ValidationError::UnknownErpSystem(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaxEntry
// ---------------------------------------------------------------------------

/// One tax component on an invoice line, e.g. `("CGST", "9%")`.
///
/// The rate is kept as the raw invoice string; parsing happens in the
/// rate-aggregation stage so that a malformed component can fail the whole
/// aggregation atomically instead of producing a partial sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEntry {
    /// Component name (CGST, SGST, IGST, UGST, CESS, ...).
    pub component: String,
    /// Percentage string as printed on the invoice, e.g. `"9%"`.
    pub rate: String,
}

impl TaxEntry {
    /// Create a tax entry.
    pub fn new(component: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            rate: rate.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LineItem
// ---------------------------------------------------------------------------

fn default_credit_eligible() -> bool {
    true
}

/// A single invoice line submitted for tax-code determination.
///
/// Supplier and buyer registration numbers are carried as raw strings:
/// unregistered vendors legitimately submit sentinel values
/// (`"UNREGISTERED"`, `"URP"`, ...) that are not valid GSTINs but still
/// drive the reverse-charge decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text item description from the invoice.
    pub description: String,
    /// HSN/SAC classification code.
    pub hsn: u32,
    /// Supplier legal name.
    pub supplier_name: String,
    /// Supplier GST registration number (raw; may be a sentinel).
    pub supplier_gstin: String,
    /// Supplier country code (ISO 3166-1 alpha-2).
    pub supplier_country: String,
    /// Buyer GST registration number (raw).
    pub buyer_gstin: String,
    /// Buyer country code.
    pub buyer_country: String,
    /// Ordered tax component breakdown.
    pub tax: Vec<TaxEntry>,
    /// Whether the buyer may offset this tax as an input credit.
    #[serde(default = "default_credit_eligible")]
    pub credit_eligible: bool,
    /// Purchase order reference, if the source document carries one.
    #[serde(default)]
    pub po_number: Option<String>,
    /// Ordered quantity.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Unit price as printed (string, to avoid floating-point drift).
    #[serde(default)]
    pub unit_price: Option<String>,
    /// Line total including tax, as printed.
    #[serde(default)]
    pub total: Option<String>,
}

impl LineItem {
    /// Create a line item for a domestic transaction with no tax breakdown.
    ///
    /// Country codes default to `"IN"`; use the builders to override.
    pub fn new(
        description: impl Into<String>,
        hsn: u32,
        supplier_name: impl Into<String>,
        supplier_gstin: impl Into<String>,
        buyer_gstin: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            hsn,
            supplier_name: supplier_name.into(),
            supplier_gstin: supplier_gstin.into(),
            supplier_country: "IN".to_string(),
            buyer_gstin: buyer_gstin.into(),
            buyer_country: "IN".to_string(),
            tax: Vec::new(),
            credit_eligible: true,
            po_number: None,
            quantity: None,
            unit_price: None,
            total: None,
        }
    }

    /// Builder: set the tax component breakdown.
    pub fn with_tax(mut self, tax: Vec<TaxEntry>) -> Self {
        self.tax = tax;
        self
    }

    /// Builder: set the supplier country.
    pub fn with_supplier_country(mut self, country: impl Into<String>) -> Self {
        self.supplier_country = country.into();
        self
    }

    /// Builder: set the buyer country.
    pub fn with_buyer_country(mut self, country: impl Into<String>) -> Self {
        self.buyer_country = country.into();
        self
    }

    /// Builder: set input-credit eligibility.
    pub fn with_credit_eligible(mut self, eligible: bool) -> Self {
        self.credit_eligible = eligible;
        self
    }

    /// Builder: attach purchase-order metadata.
    pub fn with_purchase_order(mut self, po_number: impl Into<String>, quantity: u32) -> Self {
        self.po_number = Some(po_number.into());
        self.quantity = Some(quantity);
        self
    }

    /// Builder: attach printed amounts.
    pub fn with_amounts(
        mut self,
        unit_price: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        self.unit_price = Some(unit_price.into());
        self.total = Some(total.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn erp_system_wire_values() {
        assert_eq!(ErpSystem::SapEcc.as_str(), "SAP_ECC");
        assert_eq!(ErpSystem::Oracle.as_str(), "ORACLE");
        assert_eq!(ErpSystem::Dynamics365.as_str(), "MS_365");
    }

    #[test]
    fn erp_system_default_is_sap() {
        assert_eq!(ErpSystem::default(), ErpSystem::SapEcc);
    }

    #[test]
    fn erp_system_from_str_roundtrip() {
        for erp in ErpSystem::all() {
            assert_eq!(ErpSystem::from_str(erp.as_str()).unwrap(), *erp);
        }
    }

    #[test]
    fn erp_system_from_str_rejects_unknown() {
        let err = ErpSystem::from_str("NETSUITE").unwrap_err();
        assert!(format!("{err}").contains("NETSUITE"));
    }

    #[test]
    fn erp_system_serde_uses_wire_values() {
        let json = serde_json::to_string(&ErpSystem::Dynamics365).unwrap();
        assert_eq!(json, "\"MS_365\"");
        let back: ErpSystem = serde_json::from_str("\"ORACLE\"").unwrap();
        assert_eq!(back, ErpSystem::Oracle);
    }

    #[test]
    fn line_item_builder() {
        let line = LineItem::new(
            "Professional consulting services",
            998314,
            "ABC Consultants Pvt Ltd",
            "27AABCU9603R1ZM",
            "27AADCB2501D1ZF",
        )
        .with_tax(vec![TaxEntry::new("CGST", "9%"), TaxEntry::new("SGST", "9%")])
        .with_purchase_order("PO-2024-001", 1)
        .with_amounts("100000.00", "118000.00");

        assert_eq!(line.supplier_country, "IN");
        assert_eq!(line.buyer_country, "IN");
        assert!(line.credit_eligible);
        assert_eq!(line.tax.len(), 2);
        assert_eq!(line.po_number.as_deref(), Some("PO-2024-001"));
        assert_eq!(line.total.as_deref(), Some("118000.00"));
    }

    #[test]
    fn line_item_foreign_supplier() {
        let line = LineItem::new("Cloud hosting", 998315, "Acme Inc", "", "27AADCB2501D1ZF")
            .with_supplier_country("US");
        assert_eq!(line.supplier_country, "US");
    }

    #[test]
    fn line_item_serde_defaults_credit_eligible() {
        let json = r#"{
            "description": "Software license",
            "hsn": 997331,
            "supplier_name": "XYZ Tech",
            "supplier_gstin": "29AABCX1234F1Z5",
            "supplier_country": "IN",
            "buyer_gstin": "27AADCB2501D1ZF",
            "buyer_country": "IN",
            "tax": [{"component": "IGST", "rate": "18%"}]
        }"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert!(line.credit_eligible);
        assert!(line.po_number.is_none());
    }
}
