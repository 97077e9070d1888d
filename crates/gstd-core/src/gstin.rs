//! # GSTIN Identifier Newtype
//!
//! The 15-character Goods-and-Services-Tax registration number. The first
//! two characters encode the state (region) code; character 14 is the
//! literal `Z` check marker.
//!
//! ## Validation
//!
//! Format is validated positionally at construction time:
//!
//! | Positions | Content                          |
//! |-----------|----------------------------------|
//! | 1–2       | state code (digits)              |
//! | 3–7       | PAN letters (uppercase)          |
//! | 8–11      | PAN digits                       |
//! | 12        | PAN check letter (uppercase)     |
//! | 13        | entity code (`1`–`9` or `A`–`Z`) |
//! | 14        | literal `Z`                      |
//! | 15        | check character (`0`–`9`, `A`–`Z`) |
//!
//! Length violations and shape violations are reported as distinct
//! [`ValidationError`] variants so callers can tell truncated input from
//! corrupted input.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated 15-character GST registration number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gstin(String);

impl Gstin {
    /// Create a GSTIN from a string, validating the positional format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::GstinLength`] when the input is not
    /// exactly 15 characters, or [`ValidationError::GstinFormat`] when any
    /// position violates the expected character class.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Validate GSTIN format without constructing.
    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.len() != 15 {
            return Err(ValidationError::GstinLength {
                value: s.to_string(),
                len: s.len(),
            });
        }

        let bytes = s.as_bytes();
        let shape_ok = bytes[0..2].iter().all(u8::is_ascii_digit)
            && bytes[2..7].iter().all(u8::is_ascii_uppercase)
            && bytes[7..11].iter().all(u8::is_ascii_digit)
            && bytes[11].is_ascii_uppercase()
            && (bytes[12].is_ascii_uppercase() || (b'1'..=b'9').contains(&bytes[12]))
            && bytes[13] == b'Z'
            && (bytes[14].is_ascii_uppercase() || bytes[14].is_ascii_digit());

        if !shape_ok {
            return Err(ValidationError::GstinFormat(s.to_string()));
        }

        Ok(())
    }

    /// Access the full GSTIN string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-character state code encoded in positions 1–2.
    pub fn region_code(&self) -> &str {
        &self.0[0..2]
    }
}

impl std::fmt::Display for Gstin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_gstin_accepted() {
        let g = Gstin::new("27AABCU9603R1ZM").unwrap();
        assert_eq!(g.as_str(), "27AABCU9603R1ZM");
        assert_eq!(g.region_code(), "27");
    }

    #[test]
    fn region_code_is_first_two_characters() {
        let g = Gstin::new("29AABCX1234F1Z5").unwrap();
        assert_eq!(g.region_code(), "29");
    }

    #[test]
    fn short_input_rejected_as_length() {
        let err = Gstin::new("27AABCU").unwrap_err();
        assert_eq!(err.reason(), "invalid_length");
    }

    #[test]
    fn empty_input_rejected_as_length() {
        let err = Gstin::new("").unwrap_err();
        assert_eq!(err.reason(), "invalid_length");
    }

    #[test]
    fn long_input_rejected_as_length() {
        let err = Gstin::new("27AABCU9603R1ZMX").unwrap_err();
        assert_eq!(err.reason(), "invalid_length");
    }

    #[test]
    fn lowercase_pan_rejected_as_format() {
        let err = Gstin::new("27aabcu9603R1ZM").unwrap_err();
        assert_eq!(err.reason(), "invalid_format");
    }

    #[test]
    fn non_digit_state_code_rejected_as_format() {
        let err = Gstin::new("A7AABCU9603R1ZM").unwrap_err();
        assert_eq!(err.reason(), "invalid_format");
    }

    #[test]
    fn entity_code_zero_rejected() {
        // Position 13 permits 1-9 and A-Z, never 0.
        let err = Gstin::new("27AABCU9603R0ZM").unwrap_err();
        assert_eq!(err.reason(), "invalid_format");
    }

    #[test]
    fn missing_check_marker_rejected() {
        // Position 14 must be the literal 'Z'.
        let err = Gstin::new("27AABCU9603R1XM").unwrap_err();
        assert_eq!(err.reason(), "invalid_format");
    }

    #[test]
    fn digit_check_character_accepted() {
        let g = Gstin::new("29AABCX1234F1Z5").unwrap();
        assert_eq!(g.as_str().len(), 15);
    }

    #[test]
    fn unregistered_sentinel_rejected_as_length() {
        assert!(Gstin::new("UNREGISTERED").is_err());
    }

    #[test]
    fn display_matches_input() {
        let g = Gstin::new("27AADCB2501D1ZF").unwrap();
        assert_eq!(g.to_string(), "27AADCB2501D1ZF");
    }

    #[test]
    fn serde_roundtrip() {
        let g = Gstin::new("27AABCU9603R1ZM").unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: Gstin = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_well_shaped_gstin_validates(
                s in "[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]"
            ) {
                let g = Gstin::new(s.clone()).unwrap();
                prop_assert_eq!(g.region_code(), &s[0..2]);
            }

            #[test]
            fn arbitrary_input_never_panics(s in ".*") {
                if let Ok(g) = Gstin::new(s) {
                    prop_assert_eq!(g.as_str().len(), 15);
                }
            }

            #[test]
            fn wrong_length_always_reports_length_reason(
                s in "[0-9A-Z]{0,14}|[0-9A-Z]{16,24}"
            ) {
                let err = Gstin::new(s).unwrap_err();
                prop_assert_eq!(err.reason(), "invalid_length");
            }
        }
    }
}
