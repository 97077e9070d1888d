//! # Error Hierarchy
//!
//! Structured error types for the determination engine, built with
//! `thiserror`. Each variant carries the rejected input and the expected
//! format so that operators can diagnose malformed invoice data without
//! guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// GSTIN is not exactly 15 characters.
    #[error("GSTIN must be 15 characters, got {len}: \"{value}\"")]
    GstinLength {
        /// The string that was rejected.
        value: String,
        /// Its actual length.
        len: usize,
    },

    /// GSTIN is 15 characters but violates the positional shape.
    #[error(
        "invalid GSTIN format: \"{0}\" (expected 2 digits, 5 letters, 4 digits, \
         1 letter, 1 entity character, literal 'Z', 1 check character)"
    )]
    GstinFormat(String),

    /// ERP system selector string is not one of the known systems.
    #[error("unknown ERP system: \"{0}\" (expected SAP_ECC, ORACLE, or MS_365)")]
    UnknownErpSystem(String),
}

impl ValidationError {
    /// Short machine-readable reason code, used in telemetry events.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::GstinLength { .. } => "invalid_length",
            Self::GstinFormat(_) => "invalid_format",
            Self::UnknownErpSystem(_) => "unknown_erp",
        }
    }
}
