//! Type-directed extraction: locate the first or every value of a target
//! type inside noisy text and convert it.

mod boolean;
mod datetime;
mod number;

pub use datetime::{format_iso8601, from_unix_seconds, parse_iso8601, to_unix_seconds};
pub use number::nearly_equal;

pub(crate) use datetime::FormatMatcher;

use std::fmt::{self, Write as _};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{PluckError, Result};
use crate::tokens::TokenTable;

/// Shared state for one extraction call: the token table in effect and the
/// date/time format pattern, when one was supplied.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    table: &'a TokenTable,
    format: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(table: &'a TokenTable, format: Option<&'a str>) -> Self {
        Self { table, format }
    }

    pub fn table(&self) -> &'a TokenTable {
        self.table
    }

    pub fn format(&self) -> Option<&'a str> {
        self.format
    }
}

/// A type whose values can be located in free text.
///
/// `first` and `all` report what the text actually contains; [`Extract`]
/// layers the presence semantics on top.
pub trait Scalar: Sized {
    /// Name used for this target in error messages.
    const TARGET: &'static str;

    /// The first value in the text, if any.
    fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>>;

    /// Every value in the text, left to right.
    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>>;

    /// What a plain scalar target reports when the text holds no match.
    fn fallback() -> Self;
}

/// A complete extraction target.
///
/// The wrapper decides what absence means: a plain scalar falls back to its
/// zero value, an `Option` answers `None`, and a `Vec` comes back empty.
pub trait Extract: Sized {
    fn extract(text: &str, cx: &Context<'_>) -> Result<Self>;
}

macro_rules! extract_via_scalar {
    ($($target:ty),* $(,)?) => {$(
        impl Extract for $target {
            fn extract(text: &str, cx: &Context<'_>) -> Result<Self> {
                Ok(<$target as Scalar>::first(text, cx)?
                    .unwrap_or_else(<$target as Scalar>::fallback))
            }
        }
    )*};
}

extract_via_scalar!(
    i16, i32, i64, u16, u32, u64, f32, f64, Decimal, bool, String, NaiveDateTime, NaiveDate,
);

impl<T: Scalar> Extract for Option<T> {
    fn extract(text: &str, cx: &Context<'_>) -> Result<Self> {
        T::first(text, cx)
    }
}

impl<T: Scalar> Extract for Vec<T> {
    fn extract(text: &str, cx: &Context<'_>) -> Result<Self> {
        T::all(text, cx)
    }
}

impl Scalar for String {
    const TARGET: &'static str = "text";

    fn first(text: &str, _cx: &Context<'_>) -> Result<Option<Self>> {
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
        Ok(Self::first(text, cx)?.into_iter().collect())
    }

    fn fallback() -> Self {
        String::new()
    }
}

/// Text transform applied before extraction.
#[derive(Debug, Clone)]
pub enum Prefilter {
    /// Keep only the first match of the regex; everything else is dropped.
    Select(Regex),
    /// Remove every match of the regex.
    Remove(Regex),
    /// Remove every occurrence of a literal string.
    RemoveLiteral(String),
}

impl Prefilter {
    fn apply(&self, text: &str) -> String {
        match self {
            Prefilter::Select(regex) => regex
                .find(text)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            Prefilter::Remove(regex) => regex.replace_all(text, "").into_owned(),
            Prefilter::RemoveLiteral(needle) => text.replace(needle.as_str(), ""),
        }
    }
}

/// Reusable extraction pipeline.
///
/// Renders the input to text, applies the optional prefilter, trims, and
/// hands the result to the target type.
///
/// ```
/// use pluck_core::Extractor;
///
/// let rating: i32 = Extractor::new().extract("rated 7.5 out of 10").unwrap();
/// assert_eq!(rating, 8);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Extractor {
    format: Option<String>,
    prefilter: Option<Prefilter>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `format` for date/time targets.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Transform the text before extraction.
    pub fn with_prefilter(mut self, prefilter: Prefilter) -> Self {
        self.prefilter = Some(prefilter);
        self
    }

    /// Extract a `T` from anything that renders as text.
    pub fn extract<T: Extract>(&self, raw: impl fmt::Display) -> Result<T> {
        let mut text = String::new();
        write!(text, "{raw}").map_err(|_| PluckError::StringConversion)?;
        if let Some(prefilter) = &self.prefilter {
            text = prefilter.apply(&text);
        }
        let cx = Context::new(TokenTable::builtin(), self.format.as_deref());
        T::extract(text.trim(), &cx)
    }
}
