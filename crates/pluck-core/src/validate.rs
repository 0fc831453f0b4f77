//! Column-rule validation for delimiter-separated text.

use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::extract::{FormatMatcher, parse_iso8601};
use crate::tokens::{
    EMAIL_TEMPLATE, NUMBER_TEMPLATE, PHONE_TEMPLATE, TokenTable, UNSIGNED_NUMBER_TEMPLATE,
};
use crate::value::ScalarKind;

/// How a delimited document should be validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Cell separator.
    pub delimiter: char,
    /// Whether the first line is a header row.
    pub has_header: bool,
    /// Collect every issue instead of stopping at the first.
    pub report_all: bool,
    /// Per-column rules.
    pub columns: Vec<ColumnRule>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            report_all: false,
            columns: Vec::new(),
        }
    }
}

/// Constraints for one column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRule {
    /// Header name; locates the column when `index` is absent.
    pub header: String,
    /// Zero-based column position, overriding header lookup.
    pub index: Option<usize>,
    /// Expected cell type.
    pub kind: Option<ScalarKind>,
    /// Expected well-known cell shape, checked on top of `kind`.
    pub special: Option<SpecialKind>,
    /// Reject empty cells.
    pub required: bool,
    /// Format pattern for date/time cells; ISO 8601 is assumed without one.
    pub format: Option<String>,
    /// Regex every cell must match.
    pub pattern: Option<String>,
    /// Exhaustive list of accepted cell values.
    pub allowed: Vec<String>,
    /// Cell values rejected outright.
    pub denied: Vec<String>,
    /// Minimum cell length in characters.
    pub min_length: Option<usize>,
    /// Maximum cell length in characters.
    pub max_length: Option<usize>,
    /// Minimum numeric value.
    pub min_value: Option<Decimal>,
    /// Maximum numeric value.
    pub max_value: Option<Decimal>,
}

/// Well-known cell shapes with a built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialKind {
    Email,
    Phone,
}

/// One violation, localized by 1-based line and column when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
}

/// Validate `text` against the column rules.
///
/// Cells split on the bare delimiter; quoting is not interpreted. Blank
/// lines are skipped. The error side of the result reports configuration
/// problems (a rule regex or format pattern that does not compile), never
/// data problems; those come back as issues.
pub fn validate_delimited(
    text: &str,
    options: &ValidationOptions,
) -> Result<Vec<ValidationIssue>> {
    let table = TokenTable::builtin();
    let mut issues = Vec::new();

    let mut lines = text.lines().enumerate();
    let headers: Vec<String> = if options.has_header {
        match lines.next() {
            Some((_, line)) => line
                .split(options.delimiter)
                .map(|header| header.trim().to_string())
                .collect(),
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    let mut checkers = Vec::new();
    for rule in &options.columns {
        match column_index(rule, &headers) {
            Some(index) => checkers.push(ColumnChecker::new(rule, index, table)?),
            None => {
                issues.push(ValidationIssue {
                    line: None,
                    column: None,
                    message: format!("column '{}' not found in header", rule.header),
                });
                if !options.report_all {
                    return Ok(issues);
                }
            }
        }
    }

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(options.delimiter).collect();
        for checker in &checkers {
            if let Some(message) = checker.check(&cells, table) {
                issues.push(ValidationIssue {
                    line: Some(line_no + 1),
                    column: Some(checker.index + 1),
                    message,
                });
                if !options.report_all {
                    return Ok(issues);
                }
            }
        }
    }

    debug!(
        "validated {} column rule(s), {} issue(s)",
        options.columns.len(),
        issues.len()
    );
    Ok(issues)
}

fn column_index(rule: &ColumnRule, headers: &[String]) -> Option<usize> {
    if let Some(index) = rule.index {
        return Some(index);
    }
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(rule.header.as_str()))
}

struct ColumnChecker<'a> {
    rule: &'a ColumnRule,
    index: usize,
    pattern: Option<Regex>,
    format: Option<FormatMatcher>,
    shape: Option<Regex>,
    special: Option<Regex>,
}

impl<'a> ColumnChecker<'a> {
    fn new(rule: &'a ColumnRule, index: usize, table: &TokenTable) -> Result<Self> {
        let pattern = match &rule.pattern {
            Some(pattern) => Some(Regex::new(pattern)?),
            None => None,
        };
        let format = match (rule.kind, &rule.format) {
            (Some(ScalarKind::DateTime | ScalarKind::Date), Some(format)) => {
                Some(FormatMatcher::anchored(format, table)?)
            }
            _ => None,
        };
        let shape = match rule.kind {
            Some(ScalarKind::SignedInt | ScalarKind::Float) => {
                Some(Regex::new(&format!("^(?:{NUMBER_TEMPLATE})$"))?)
            }
            Some(ScalarKind::UnsignedInt) => {
                Some(Regex::new(&format!("^(?:{UNSIGNED_NUMBER_TEMPLATE})$"))?)
            }
            _ => None,
        };
        let special = match rule.special {
            Some(SpecialKind::Email) => Some(Regex::new(&format!("^(?:{EMAIL_TEMPLATE})$"))?),
            Some(SpecialKind::Phone) => Some(Regex::new(&format!("^(?:{PHONE_TEMPLATE})$"))?),
            None => None,
        };
        Ok(Self {
            rule,
            index,
            pattern,
            format,
            shape,
            special,
        })
    }

    fn check(&self, cells: &[&str], table: &TokenTable) -> Option<String> {
        let cell = match cells.get(self.index) {
            Some(cell) => cell.trim(),
            None => return Some(format!("row has no column {}", self.index + 1)),
        };

        if cell.is_empty() {
            return self
                .rule
                .required
                .then(|| "required cell is empty".to_string());
        }

        if let Some(message) = self.check_kind(cell, table) {
            return Some(message);
        }

        if let Some(special) = &self.special {
            if !special.is_match(cell) {
                let what = match self.rule.special {
                    Some(SpecialKind::Email) => "an email address",
                    _ => "a phone number",
                };
                return Some(format!("'{cell}' is not {what}"));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(cell) {
                return Some(format!("'{cell}' does not match the required pattern"));
            }
        }

        if !self.rule.allowed.is_empty() && !self.rule.allowed.iter().any(|v| v == cell) {
            return Some(format!("'{cell}' is not an allowed value"));
        }
        if self.rule.denied.iter().any(|v| v == cell) {
            return Some(format!("'{cell}' is a denied value"));
        }

        let length = cell.chars().count();
        if let Some(min) = self.rule.min_length {
            if length < min {
                return Some(format!("'{cell}' is shorter than {min} character(s)"));
            }
        }
        if let Some(max) = self.rule.max_length {
            if length > max {
                return Some(format!("'{cell}' is longer than {max} character(s)"));
            }
        }

        None
    }

    fn check_kind(&self, cell: &str, table: &TokenTable) -> Option<String> {
        match self.rule.kind? {
            ScalarKind::Text => None,
            ScalarKind::Boolean => match table.classify_bool(cell) {
                Some(_) => None,
                None => Some(format!("'{cell}' is not a boolean word")),
            },
            kind @ (ScalarKind::SignedInt | ScalarKind::UnsignedInt | ScalarKind::Float) => {
                self.check_number(cell, kind)
            }
            ScalarKind::DateTime | ScalarKind::Date => self.check_date(cell),
        }
    }

    fn check_number(&self, cell: &str, kind: ScalarKind) -> Option<String> {
        if let Some(shape) = &self.shape {
            if !shape.is_match(cell) {
                return Some(format!("'{cell}' does not read as {kind}"));
            }
        }
        let cleaned: String = cell.chars().filter(|&c| c != ',').collect();
        let value = match Decimal::from_str(&cleaned) {
            Ok(value) => value,
            Err(_) => return Some(format!("'{cell}' does not read as {kind}")),
        };
        if matches!(kind, ScalarKind::SignedInt | ScalarKind::UnsignedInt)
            && value.fract() != Decimal::ZERO
        {
            return Some(format!("'{cell}' is not a whole number"));
        }
        if let Some(min) = self.rule.min_value {
            if value < min {
                return Some(format!("'{cell}' is below the minimum {min}"));
            }
        }
        if let Some(max) = self.rule.max_value {
            if value > max {
                return Some(format!("'{cell}' is above the maximum {max}"));
            }
        }
        None
    }

    fn check_date(&self, cell: &str) -> Option<String> {
        match &self.format {
            Some(matcher) => match matcher.regex().captures(cell) {
                Some(caps) => matcher.resolve(&caps).err().map(|e| e.to_string()),
                None => Some(format!(
                    "'{cell}' does not match the format '{}'",
                    matcher.pattern()
                )),
            },
            None => {
                let iso = parse_iso8601(cell).is_ok()
                    || NaiveDate::parse_from_str(cell, "%Y-%m-%d").is_ok();
                (!iso).then(|| format!("'{cell}' is not an ISO 8601 date"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROSTER: &str = "\
name,age,active,joined
Ada,36,yes,24/07/2018
Bob,-1,no,01/08/2018
,17,maybe,2018-99-01
";

    fn roster_options(report_all: bool) -> ValidationOptions {
        ValidationOptions {
            report_all,
            columns: vec![
                ColumnRule {
                    header: "name".to_string(),
                    required: true,
                    min_length: Some(1),
                    ..ColumnRule::default()
                },
                ColumnRule {
                    header: "age".to_string(),
                    kind: Some(ScalarKind::SignedInt),
                    min_value: Some(Decimal::ZERO),
                    ..ColumnRule::default()
                },
                ColumnRule {
                    header: "active".to_string(),
                    kind: Some(ScalarKind::Boolean),
                    ..ColumnRule::default()
                },
                ColumnRule {
                    header: "joined".to_string(),
                    kind: Some(ScalarKind::DateTime),
                    format: Some("dd/MM/yyyy".to_string()),
                    ..ColumnRule::default()
                },
            ],
            ..ValidationOptions::default()
        }
    }

    #[test]
    fn test_stops_at_the_first_issue_by_default() {
        let issues = validate_delimited(ROSTER, &roster_options(false)).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(3));
        assert_eq!(issues[0].column, Some(2));
        assert!(issues[0].message.contains("below the minimum"));
    }

    #[test]
    fn test_report_all_collects_every_issue() {
        let issues = validate_delimited(ROSTER, &roster_options(true)).unwrap();
        let summary: Vec<(Option<usize>, Option<usize>)> =
            issues.iter().map(|issue| (issue.line, issue.column)).collect();
        assert_eq!(
            summary,
            vec![
                (Some(3), Some(2)),
                (Some(4), Some(1)),
                (Some(4), Some(3)),
                (Some(4), Some(4)),
            ]
        );
    }

    #[test]
    fn test_clean_data_has_no_issues() {
        let clean = "name,age,active,joined\nAda,36,yes,24/07/2018\n";
        let issues = validate_delimited(clean, &roster_options(true)).unwrap();
        assert_eq!(issues, Vec::new());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let options = ValidationOptions {
            columns: vec![ColumnRule {
                header: "AGE".to_string(),
                kind: Some(ScalarKind::SignedInt),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let issues = validate_delimited("age\nnot-a-number\n", &options).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("does not read as int"));
    }

    #[test]
    fn test_unknown_column_is_reported_without_a_line() {
        let options = ValidationOptions {
            columns: vec![ColumnRule {
                header: "salary".to_string(),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let issues = validate_delimited("name\nAda\n", &options).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, None);
        assert!(issues[0].message.contains("salary"));
    }

    #[test]
    fn test_explicit_index_skips_header_lookup() {
        let options = ValidationOptions {
            has_header: false,
            columns: vec![ColumnRule {
                index: Some(1),
                kind: Some(ScalarKind::UnsignedInt),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let issues = validate_delimited("x;-4\ny;12\n", &ValidationOptions {
            delimiter: ';',
            ..options
        })
        .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(1));
    }

    #[test]
    fn test_allowed_denied_and_length_rules() {
        let options = ValidationOptions {
            report_all: true,
            columns: vec![ColumnRule {
                header: "code".to_string(),
                allowed: vec![
                    "alpha".to_string(),
                    "beta".to_string(),
                    "gamma-prime".to_string(),
                    "x".to_string(),
                ],
                denied: vec!["beta".to_string()],
                min_length: Some(2),
                max_length: Some(8),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let data = "code\nalpha\ndelta\nbeta\nx\ngamma-prime\n";
        let issues = validate_delimited(data, &options).unwrap();
        let lines: Vec<Option<usize>> = issues.iter().map(|issue| issue.line).collect();
        assert_eq!(lines, vec![Some(3), Some(4), Some(5), Some(6)]);
        assert!(issues[0].message.contains("not an allowed value"));
        assert!(issues[1].message.contains("is a denied value"));
        assert!(issues[2].message.contains("shorter than 2 character(s)"));
        assert!(issues[3].message.contains("longer than 8 character(s)"));
    }

    #[test]
    fn test_pattern_rule_rejects_nonconforming_cells() {
        let options = ValidationOptions {
            columns: vec![ColumnRule {
                header: "sku".to_string(),
                pattern: Some("^[A-Z]{2}-[0-9]{2}$".to_string()),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let issues = validate_delimited("sku\nXY-99\nXY99\n", &options).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(3));
        assert!(issues[0].message.contains("does not match the required pattern"));
    }

    #[test]
    fn test_numeric_bounds_reject_out_of_range_values() {
        let options = ValidationOptions {
            report_all: true,
            columns: vec![ColumnRule {
                header: "score".to_string(),
                kind: Some(ScalarKind::Float),
                min_value: Some(Decimal::ZERO),
                max_value: Some(Decimal::new(100, 0)),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let issues = validate_delimited("score\n99.5\n100.01\n-0.5\n", &options).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, Some(3));
        assert!(issues[0].message.contains("above the maximum 100"));
        assert_eq!(issues[1].line, Some(4));
        assert!(issues[1].message.contains("below the minimum 0"));
    }

    #[test]
    fn test_date_cells_without_a_format_accept_iso8601_only() {
        let options = ValidationOptions {
            report_all: true,
            columns: vec![ColumnRule {
                header: "seen".to_string(),
                kind: Some(ScalarKind::DateTime),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        let data = "seen\n2018-07-24T01:26:00\n2018-07-24\n24/07/2018\n";
        let issues = validate_delimited(data, &options).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(4));
        assert!(issues[0].message.contains("not an ISO 8601 date"));
    }

    #[test]
    fn test_special_kinds_check_email_and_phone_shapes() {
        let options = ValidationOptions {
            report_all: true,
            columns: vec![
                ColumnRule {
                    header: "contact".to_string(),
                    special: Some(SpecialKind::Email),
                    ..ColumnRule::default()
                },
                ColumnRule {
                    header: "phone".to_string(),
                    special: Some(SpecialKind::Phone),
                    ..ColumnRule::default()
                },
            ],
            ..ValidationOptions::default()
        };
        let data = "contact,phone\nada@example.com,+48 601 234 567\nnot-an-email,12-34\n";
        let issues = validate_delimited(data, &options).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("email address"));
        assert!(issues[1].message.contains("phone number"));
    }

    #[test]
    fn test_bad_rule_regex_is_a_configuration_error() {
        let options = ValidationOptions {
            columns: vec![ColumnRule {
                header: "name".to_string(),
                pattern: Some("(".to_string()),
                ..ColumnRule::default()
            }],
            ..ValidationOptions::default()
        };
        assert!(validate_delimited("name\nAda\n", &options).is_err());
    }

    #[test]
    fn test_options_deserialize_from_json_rules() {
        let rules = r#"{
            "delimiter": ",",
            "report_all": true,
            "columns": [
                {"header": "age", "kind": "int", "required": true, "min_value": "0"},
                {"header": "joined", "kind": "datetime", "format": "dd/MM/yyyy"},
                {"header": "contact", "special": "email"}
            ]
        }"#;
        let options: ValidationOptions = serde_json::from_str(rules).unwrap();
        assert_eq!(options.columns.len(), 3);
        assert_eq!(options.columns[0].kind, Some(ScalarKind::SignedInt));
        assert!(options.columns[0].required);
        assert_eq!(options.columns[1].format.as_deref(), Some("dd/MM/yyyy"));
        assert_eq!(options.columns[2].special, Some(SpecialKind::Email));
    }
}
