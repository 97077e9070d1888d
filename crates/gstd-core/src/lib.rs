#![deny(missing_docs)]

//! # gstd-core — Foundational Types for the gstd Determination Engine
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde` and `thiserror`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`Gstin`] is a distinct
//!    type validated at construction; a raw `String` never carries a
//!    registration number past the crate boundary.
//!
//! 2. **Amounts are strings.** Monetary fields on [`LineItem`] are carried
//!    as strings so that pass-through values survive serialization without
//!    floating-point drift.
//!
//! 3. **[`ValidationError`] hierarchy.** Structured errors with `thiserror`
//!    that carry the rejected input and the expected format — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! 4. **Results degrade per line, never per batch.** [`LineResult`] and
//!    [`BatchSummary`] encode the sentinel and bucket-count conventions the
//!    whole pipeline relies on.

pub mod error;
pub mod gstin;
pub mod line;
pub mod result;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use gstin::Gstin;
pub use line::{ErpSystem, LineItem, TaxEntry};
pub use result::{
    BatchSummary, DeterminationResult, LineResult, Provenance, TokenUsage, ERROR_CODE,
    MANUAL_REVIEW_CODE,
};
