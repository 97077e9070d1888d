//! # Generative-Fallback Instruction Sets
//!
//! The natural-language instruction text handed to the generative
//! fallback alongside the line context. The text is opaque configuration
//! as far as the pipeline is concerned: it is selected per ERP system,
//! bundled defaults can be overridden at construction time, and nothing
//! in the decision logic depends on its content.

use std::collections::BTreeMap;

use gstd_core::ErpSystem;

const SAP_ECC_INSTRUCTIONS: &str = "\
You are an expert SAP ECC tax classification agent for Indian GST compliance.

Determine the correct SAP ECC tax code for the invoice line described in the
context, using the tax rate, the supplier and buyer state codes, the
transaction type, RCM applicability, and ITC eligibility.

Rules:
1. Intrastate (same state): CGST-SGST codes (3-series); union territories
   take the _UT variant.
2. Interstate (different states): IGST codes (1-series).
3. Reverse charge: R-prefix codes (R1, R3, R6, R9, ...).
4. Blocked input credit: _NC suffix.

Rate mapping: 0.25% -> 3A/1A, 3% -> 3B/1B, 5% -> 3C/1C, 12% -> 3X/1X,
18% -> 3Z/1Z, 28% -> 3Y/1Y (intra/inter). RCM: 5% -> R3/R1, 12% -> R6/R4,
18% -> R9/R7, 28% -> R12/R10.

Union territory state codes: 04, 07, 25, 26, 31, 34, 35, 38.

Respond with a JSON object: {\"tax_code\": string, \"reasoning\": string,
\"confidence\": number between 0 and 1}.";

const ORACLE_INSTRUCTIONS: &str = "\
You are a tax classification agent for Indian GST compliance on Oracle ERP.

The Oracle tax-code master is sparsely configured: ORA_CGST_SGST_<rate> for
intrastate and ORA_IGST_<rate> for interstate, at the standard rates 5, 12,
18, and 28. For combinations outside that coverage, propose the code that
fits the naming convention and lower your confidence accordingly.

Respond with a JSON object: {\"tax_code\": string, \"reasoning\": string,
\"confidence\": number between 0 and 1}.";

const DYNAMICS_INSTRUCTIONS: &str = "\
You are a tax classification agent for Indian GST compliance on Microsoft
Dynamics 365.

The Dynamics master uses MS_IN_CGST_SGST_<rate> for intrastate and
MS_IN_IGST_<rate> for interstate at the standard rates 5, 12, 18, and 28.
For combinations outside that coverage, propose the code that fits the
naming convention and lower your confidence accordingly.

Respond with a JSON object: {\"tax_code\": string, \"reasoning\": string,
\"confidence\": number between 0 and 1}.";

/// Per-ERP instruction texts with bundled defaults.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    overrides: BTreeMap<ErpSystem, String>,
}

impl InstructionSet {
    /// Create an instruction set carrying only the bundled defaults.
    pub fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    /// Builder: replace the instruction text for one ERP system.
    pub fn with_override(mut self, erp: ErpSystem, text: impl Into<String>) -> Self {
        self.overrides.insert(erp, text.into());
        self
    }

    /// The instruction text for an ERP system: the override if one was
    /// configured, otherwise the bundled default.
    pub fn instructions_for(&self, erp: ErpSystem) -> &str {
        if let Some(text) = self.overrides.get(&erp) {
            return text;
        }
        match erp {
            ErpSystem::SapEcc => SAP_ECC_INSTRUCTIONS,
            ErpSystem::Oracle => ORACLE_INSTRUCTIONS,
            ErpSystem::Dynamics365 => DYNAMICS_INSTRUCTIONS,
        }
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exist_for_every_erp() {
        let set = InstructionSet::new();
        for erp in ErpSystem::all() {
            assert!(!set.instructions_for(*erp).is_empty());
        }
    }

    #[test]
    fn defaults_differ_per_erp() {
        let set = InstructionSet::new();
        assert_ne!(
            set.instructions_for(ErpSystem::SapEcc),
            set.instructions_for(ErpSystem::Oracle)
        );
    }

    #[test]
    fn override_replaces_default_for_one_erp_only() {
        let set = InstructionSet::new().with_override(ErpSystem::Oracle, "custom text");
        assert_eq!(set.instructions_for(ErpSystem::Oracle), "custom text");
        assert!(set
            .instructions_for(ErpSystem::SapEcc)
            .contains("SAP ECC"));
    }
}
