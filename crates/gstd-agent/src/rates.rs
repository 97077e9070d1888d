//! # Tax-Rate Aggregation
//!
//! Sums an invoice line's tax component percentages into one total rate.
//! Failure is atomic: if any entry fails to parse, the whole aggregation
//! returns 0.0 — a partial sum would silently produce a wrong lookup key,
//! which is worse than a guaranteed miss.

use gstd_core::TaxEntry;

/// Sum a list of tax component percentages.
///
/// Each entry's rate string has a trailing `%` stripped and is parsed as
/// a decimal number. An empty list sums to 0.0. Any unparseable entry
/// forces the whole result to 0.0 with a warning.
pub fn aggregate_rate(entries: &[TaxEntry]) -> f64 {
    let mut total = 0.0;
    for entry in entries {
        let cleaned = entry.rate.trim().trim_end_matches('%').trim();
        match cleaned.parse::<f64>() {
            Ok(rate) => total += rate,
            Err(_) => {
                tracing::warn!(
                    operation = "aggregate_rate",
                    status = "failure",
                    component = %entry.component,
                    rate = %entry.rate,
                    "unparseable tax component rate — aggregation returns 0",
                );
                return 0.0;
            }
        }
    }
    tracing::debug!(operation = "aggregate_rate", status = "success", total);
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cgst_sgst_sum() {
        let entries = vec![TaxEntry::new("CGST", "9%"), TaxEntry::new("SGST", "9%")];
        assert_eq!(aggregate_rate(&entries), 18.0);
    }

    #[test]
    fn single_igst_component() {
        let entries = vec![TaxEntry::new("IGST", "18%")];
        assert_eq!(aggregate_rate(&entries), 18.0);
    }

    #[test]
    fn fractional_rates() {
        let entries = vec![
            TaxEntry::new("CGST", "0.125%"),
            TaxEntry::new("SGST", "0.125%"),
        ];
        assert_eq!(aggregate_rate(&entries), 0.25);
    }

    #[test]
    fn empty_list_is_zero() {
        assert_eq!(aggregate_rate(&[]), 0.0);
    }

    #[test]
    fn rate_without_percent_sign_accepted() {
        let entries = vec![TaxEntry::new("IGST", "12")];
        assert_eq!(aggregate_rate(&entries), 12.0);
    }

    #[test]
    fn whitespace_tolerated() {
        let entries = vec![TaxEntry::new("CGST", " 9 % ")];
        assert_eq!(aggregate_rate(&entries), 9.0);
    }

    #[test]
    fn one_malformed_entry_zeroes_the_whole_sum() {
        let entries = vec![
            TaxEntry::new("CGST", "9%"),
            TaxEntry::new("SGST", "nine percent"),
        ];
        assert_eq!(aggregate_rate(&entries), 0.0);
    }

    #[test]
    fn malformed_entry_after_valid_ones_still_atomic() {
        let entries = vec![
            TaxEntry::new("CGST", "9%"),
            TaxEntry::new("SGST", "9%"),
            TaxEntry::new("CESS", "??"),
        ];
        assert_eq!(aggregate_rate(&entries), 0.0);
    }
}
