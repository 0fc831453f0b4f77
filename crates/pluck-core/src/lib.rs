//! Typed value extraction from noisy, human-authored text.
//!
//! This crate provides:
//! - Format-pattern compilation (`dd/MM/yyyy HH:mm` into a search regex)
//! - Type-directed extraction of numbers, booleans, dates, and text
//! - Runtime-described targets for CLI and rule-driven callers
//! - Column-rule validation for delimiter-separated documents

pub mod clean;
pub mod error;
pub mod extract;
pub mod pattern;
pub mod text;
pub mod tokens;
pub mod validate;
pub mod value;

pub use error::{PluckError, Result};
pub use extract::{Context, Extract, Extractor, Prefilter, Scalar};
pub use extract::{format_iso8601, from_unix_seconds, nearly_equal, parse_iso8601, to_unix_seconds};
pub use pattern::CompiledPattern;
pub use tokens::{FormatToken, TokenKind, TokenTable};
pub use validate::{ColumnRule, SpecialKind, ValidationIssue, ValidationOptions, validate_delimited};
pub use value::{Cardinality, ScalarKind, TargetType, Value};

/// Re-export the date and decimal types the API speaks in.
pub use chrono::{NaiveDate, NaiveDateTime};
pub use rust_decimal::Decimal;

use std::fmt;

/// Extract a `T` from anything that renders as text, with no format pattern.
///
/// ```
/// let rating: i32 = pluck_core::extract("rated 7.5 out of 10").unwrap();
/// assert_eq!(rating, 8);
/// ```
pub fn extract<T: Extract>(raw: impl fmt::Display) -> Result<T> {
    Extractor::new().extract(raw)
}

/// Extract a `T` using a date/time format pattern.
///
/// ```
/// use pluck_core::NaiveDate;
///
/// let seen: Option<NaiveDate> =
///     pluck_core::extract_with("due 24/07/2018, maybe", "dd/MM/yyyy").unwrap();
/// assert_eq!(seen, NaiveDate::from_ymd_opt(2018, 7, 24));
/// ```
pub fn extract_with<T: Extract>(raw: impl fmt::Display, format: &str) -> Result<T> {
    Extractor::new().with_format(format).extract(raw)
}

/// Compile a date/time format pattern into its search regex.
///
/// ```
/// let regex = pluck_core::pattern_to_regex("yyyy-MM-dd").unwrap();
/// assert_eq!(regex, r"([0-9]{4}-(1[0-2]|0[1-9])-[0-3][0-9])");
/// ```
pub fn pattern_to_regex(pattern: &str) -> Result<String> {
    CompiledPattern::compile(pattern, TokenTable::builtin())
        .map(|compiled| compiled.regex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ratings_extract_as_any_numeric_target() {
        let text = "Hmmm... I would give it a 7.5 out of 10.";
        assert_eq!(extract::<i32>(text).unwrap(), 8);
        assert_eq!(extract::<f64>(text).unwrap(), 7.5);
        assert_eq!(extract::<Decimal>(text).unwrap(), Decimal::new(75, 1));
    }

    #[test]
    fn test_dates_extract_with_a_format_pattern() {
        let found: NaiveDateTime =
            extract_with("The date is 24/07/2018 01:26!", "dd/MM/yyyy HH:mm").unwrap();
        assert_eq!(
            found,
            NaiveDate::from_ymd_opt(2018, 7, 24)
                .unwrap()
                .and_hms_opt(1, 26, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_every_date_extracts_into_a_list() {
        let found: Vec<NaiveDate> = extract_with(
            "The date was 24/07/2018 but now its 01/08/2018!",
            "dd/MM/yyyy",
        )
        .unwrap();
        assert_eq!(
            found,
            vec![
                NaiveDate::from_ymd_opt(2018, 7, 24).unwrap(),
                NaiveDate::from_ymd_opt(2018, 8, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_absence_semantics_match_the_wrapper() {
        assert_eq!(extract::<Option<bool>>("maybe").unwrap(), None);
        assert_eq!(extract::<bool>("maybe").unwrap(), false);
        assert_eq!(extract::<i32>("no number").unwrap(), 0);
        assert_eq!(extract::<Vec<i64>>("nothing").unwrap(), Vec::<i64>::new());

        let fallback: NaiveDateTime = extract_with("no date here", "dd/MM/yyyy").unwrap();
        assert_eq!(fallback, from_unix_seconds(0).unwrap());
    }

    #[test]
    fn test_datetime_extraction_without_a_format_fails() {
        let err = extract::<NaiveDateTime>("24/07/2018").unwrap_err();
        assert!(matches!(err, PluckError::MissingFormat));
    }
}
