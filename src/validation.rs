//! Shared validation helpers
//!
//! Identity fields (particle names, tracker materials) are checked against a
//! character set, descriptive codes (calorimeter materials, muon chambers)
//! against a closed allow-list. Both are plain functions over explicit sets.

use crate::{DetectorError, DetectorResult};

/// Longest identifier accepted for names and materials
pub const MAX_IDENTIFIER_LENGTH: usize = 100;

/// Characters permitted in particle names and tracker materials
pub const IDENTIFIER_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Check that `value` is non-empty, at most `max_len` bytes, and uses only
/// characters from `charset`.
pub fn is_valid_in_charset(value: &str, charset: &str, max_len: usize) -> bool {
    !value.is_empty() && value.len() <= max_len && value.chars().all(|c| charset.contains(c))
}

/// Check against the standard identifier charset.
pub fn is_valid_identifier(value: &str) -> bool {
    is_valid_in_charset(value, IDENTIFIER_CHARSET, MAX_IDENTIFIER_LENGTH)
}

/// Finite real number (rejects NaN and ±∞).
pub fn is_valid_real(value: f64) -> bool {
    value.is_finite()
}

/// Validate every entry of `values` against `allowed`.
///
/// Fails on the first entry not in the list; the caller must not have
/// mutated anything before calling this.
pub fn validate_allowed<S: AsRef<str>>(
    values: &[S],
    allowed: &[&str],
    what: &str,
) -> DetectorResult<()> {
    for value in values {
        let value = value.as_ref();
        if !allowed.contains(&value) {
            return Err(DetectorError::invalid_argument(format!(
                "invalid {} '{}'; valid values are {}",
                what,
                value,
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}

/// Look up a human-readable description for `code`, falling back to the code itself.
pub fn describe<'a>(code: &'a str, table: &'a [(&'a str, &'a str)]) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, description)| *description)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("Electron"));
        assert!(is_valid_identifier("b_quark"));
        assert!(is_valid_identifier("Pi0"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("anti-top"));
        assert!(!is_valid_identifier("with space"));
        assert!(!is_valid_identifier(&"x".repeat(MAX_IDENTIFIER_LENGTH + 1)));
        assert!(is_valid_identifier(&"x".repeat(MAX_IDENTIFIER_LENGTH)));
    }

    #[test]
    fn test_custom_charset() {
        assert!(is_valid_in_charset("ABBA", "AB", 4));
        assert!(!is_valid_in_charset("ABC", "AB", 4));
        assert!(!is_valid_in_charset("ABABA", "AB", 4));
    }

    #[test]
    fn test_validate_allowed() {
        let allowed = ["MDT", "RPC"];
        assert!(validate_allowed(&["MDT", "RPC", "MDT"], &allowed, "chamber").is_ok());
        assert!(validate_allowed::<&str>(&[], &allowed, "chamber").is_ok());

        let err = validate_allowed(&["MDT", "XYZ"], &allowed, "chamber").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_describe_fallback() {
        let table = [("W", "Tungsten (W)")];
        assert_eq!(describe("W", &table), "Tungsten (W)");
        assert_eq!(describe("Fe", &table), "Fe");
    }

    #[test]
    fn test_real_validity() {
        assert!(is_valid_real(-1.0 / 3.0));
        assert!(!is_valid_real(f64::NAN));
        assert!(!is_valid_real(f64::INFINITY));
    }
}
