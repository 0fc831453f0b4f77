//! Date/time targets: locate a formatted date in noisy text and reparse the
//! match field by field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use tracing::debug;

use super::{Context, Scalar};
use crate::error::{PluckError, Result};
use crate::pattern::{CompiledPattern, Part, field_name};
use crate::tokens::{TokenKind, TokenTable};

const DATE_TIME: &str = "date/time";

/// A compiled format pattern paired with its field-capturing regex.
pub(crate) struct FormatMatcher {
    compiled: CompiledPattern,
    regex: Regex,
}

impl FormatMatcher {
    /// Matcher that searches for the pattern anywhere in the text.
    pub(crate) fn search(format: &str, table: &TokenTable) -> Result<Self> {
        let compiled = CompiledPattern::compile(format, table)?;
        let regex = Regex::new(&compiled.field_regex())?;
        Ok(Self { compiled, regex })
    }

    /// Matcher that accepts only text consisting of the pattern alone.
    pub(crate) fn anchored(format: &str, table: &TokenTable) -> Result<Self> {
        let compiled = CompiledPattern::compile(format, table)?;
        let regex = Regex::new(&format!("^{}$", compiled.field_regex()))?;
        Ok(Self { compiled, regex })
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn pattern(&self) -> &str {
        self.compiled.pattern()
    }

    /// Convert one match into a date-time by reparsing each field-bearing
    /// capture. Fields the pattern never mentioned stay at their epoch
    /// defaults; a field spelled twice keeps its first value.
    pub(crate) fn resolve(&self, caps: &Captures<'_>) -> Result<NaiveDateTime> {
        let matched = &caps[0];
        let mut fields = Fields::default();
        for (i, &(_, part)) in self.compiled.parts().iter().enumerate() {
            let token = match part {
                Part::Token(token) if token.kind.is_field() => token,
                _ => continue,
            };
            if let Some(capture) = caps.name(&field_name(i)) {
                fields.apply(token.kind, token.text, capture.as_str(), matched)?;
            }
        }
        fields.build(matched)
    }
}

#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour24: Option<u32>,
    hour12: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: Option<u32>,
    afternoon: Option<bool>,
}

impl Fields {
    fn apply(
        &mut self,
        kind: TokenKind,
        token_text: &str,
        capture: &str,
        matched: &str,
    ) -> Result<()> {
        match kind {
            TokenKind::Year => set_once(
                &mut self.year,
                parse_year(capture, token_text.len(), matched)?,
            ),
            TokenKind::Month => set_once(&mut self.month, parse_field(capture, matched)?),
            TokenKind::MonthName => set_once(&mut self.month, month_from_name(capture, matched)?),
            TokenKind::Day => set_once(&mut self.day, parse_field(capture, matched)?),
            TokenKind::Hour24 => set_once(&mut self.hour24, parse_field(capture, matched)?),
            TokenKind::Hour12 => set_once(&mut self.hour12, parse_field(capture, matched)?),
            TokenKind::Minute => set_once(&mut self.minute, parse_field(capture, matched)?),
            TokenKind::Second => set_once(&mut self.second, parse_field(capture, matched)?),
            TokenKind::Fraction => set_once(&mut self.nanos, parse_fraction(capture, matched)?),
            TokenKind::Meridiem => set_once(&mut self.afternoon, capture.starts_with('P')),
            _ => {}
        }
        Ok(())
    }

    fn build(self, matched: &str) -> Result<NaiveDateTime> {
        let year = self.year.unwrap_or(1970);
        let month = self.month.unwrap_or(1);
        let day = self.day.unwrap_or(1);
        let hour = match (self.hour24, self.hour12) {
            (Some(hour), _) => hour,
            (None, Some(hour)) => (hour % 12) + if self.afternoon == Some(true) { 12 } else { 0 },
            (None, None) => 0,
        };
        let minute = self.minute.unwrap_or(0);
        let second = self.second.unwrap_or(0);
        let nanos = self.nanos.unwrap_or(0);

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            invalid(
                matched,
                format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
            )
        })?;
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(|| {
            invalid(
                matched,
                format!("{hour:02}:{minute:02}:{second:02} is not a time of day"),
            )
        })?;
        Ok(date.and_time(time))
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn invalid(matched: &str, reason: String) -> PluckError {
    PluckError::Parse {
        value: matched.to_string(),
        target: DATE_TIME,
        reason,
    }
}

fn parse_field(capture: &str, matched: &str) -> Result<u32> {
    capture
        .parse()
        .map_err(|_| invalid(matched, format!("'{capture}' is not a number")))
}

/// One- and two-letter year spellings pivot at 50: 00-50 read as 2000s,
/// 51-99 as 1900s.
fn parse_year(capture: &str, width: usize, matched: &str) -> Result<i32> {
    let year: i32 = capture
        .parse()
        .map_err(|_| invalid(matched, format!("'{capture}' is not a year")))?;
    Ok(if width <= 2 {
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    })
}

const MONTH_NAMES: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Accepts an English month name or any leading abbreviation of at least
/// three letters.
fn month_from_name(capture: &str, matched: &str) -> Result<u32> {
    let lower = capture.to_ascii_lowercase();
    if lower.len() >= 3 {
        if let Some(index) = MONTH_NAMES.iter().position(|name| name.starts_with(&lower)) {
            return Ok(index as u32 + 1);
        }
    }
    Err(invalid(matched, format!("'{capture}' is not a month name")))
}

/// Fraction digits scale by their count, so `.5` is half a second however
/// wide the token was spelled.
fn parse_fraction(capture: &str, matched: &str) -> Result<u32> {
    let digits = capture.len() as u32;
    let value: u32 = capture
        .parse()
        .map_err(|_| invalid(matched, format!("'{capture}' is not a fraction")))?;
    Ok(value * 10u32.pow(9 - digits))
}

fn required_format<'a>(cx: &Context<'a>) -> Result<&'a str> {
    cx.format().ok_or(PluckError::MissingFormat)
}

impl Scalar for NaiveDateTime {
    const TARGET: &'static str = DATE_TIME;

    fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
        let matcher = FormatMatcher::search(required_format(cx)?, cx.table())?;
        match matcher.regex().captures(text) {
            Some(caps) => matcher.resolve(&caps).map(Some),
            None => Ok(None),
        }
    }

    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
        let matcher = FormatMatcher::search(required_format(cx)?, cx.table())?;
        let mut values = Vec::new();
        for caps in matcher.regex().captures_iter(text) {
            values.push(matcher.resolve(&caps)?);
        }
        debug!("format '{}' matched {} time(s)", matcher.pattern(), values.len());
        Ok(values)
    }

    fn fallback() -> Self {
        DateTime::UNIX_EPOCH.naive_utc()
    }
}

impl Scalar for NaiveDate {
    const TARGET: &'static str = "date";

    fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
        Ok(NaiveDateTime::first(text, cx)?.map(|at| at.date()))
    }

    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
        Ok(NaiveDateTime::all(text, cx)?
            .into_iter()
            .map(|at| at.date())
            .collect())
    }

    fn fallback() -> Self {
        DateTime::UNIX_EPOCH.naive_utc().date()
    }
}

/// Date-time for a Unix timestamp in seconds, when it is in range.
pub fn from_unix_seconds(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|at| at.naive_utc())
}

/// Seconds since the Unix epoch.
pub fn to_unix_seconds(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp()
}

/// Parse an ISO 8601 date-time, with or without fractional seconds.
pub fn parse_iso8601(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| PluckError::Parse {
        value: text.to_string(),
        target: DATE_TIME,
        reason: e.to_string(),
    })
}

/// Render as ISO 8601; the fraction is omitted when it is zero.
pub fn format_iso8601(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
