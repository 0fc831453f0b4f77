//! Runtime-described extraction targets, for callers that only learn the
//! target type at runtime (CLI arguments, validation rules).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PluckError, Result};
use crate::extract::Extractor;

/// The scalar half of a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScalarKind {
    SignedInt,
    UnsignedInt,
    Float,
    Text,
    Boolean,
    DateTime,
    Date,
}

/// How many values the target expects and what absence means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// One value, falling back to the type's zero value.
    Scalar,
    /// One value or `null`.
    Nullable,
    /// Every value in the text.
    List,
}

/// A complete runtime target: `int`, `nullable<bool>`, `list<datetime>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetType {
    pub kind: ScalarKind,
    pub cardinality: Cardinality,
}

impl TargetType {
    pub const fn new(kind: ScalarKind, cardinality: Cardinality) -> Self {
        Self { kind, cardinality }
    }

    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::new(kind, Cardinality::Scalar)
    }

    pub const fn nullable(kind: ScalarKind) -> Self {
        Self::new(kind, Cardinality::Nullable)
    }

    pub const fn list(kind: ScalarKind) -> Self {
        Self::new(kind, Cardinality::List)
    }
}

impl FromStr for ScalarKind {
    type Err = PluckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "i16" | "i32" | "i64" => Ok(ScalarKind::SignedInt),
            "uint" | "unsigned" | "u16" | "u32" | "u64" => Ok(ScalarKind::UnsignedInt),
            "float" | "double" | "decimal" | "number" | "f32" | "f64" => Ok(ScalarKind::Float),
            "text" | "string" | "str" => Ok(ScalarKind::Text),
            "bool" | "boolean" => Ok(ScalarKind::Boolean),
            "datetime" | "date-time" | "timestamp" => Ok(ScalarKind::DateTime),
            "date" => Ok(ScalarKind::Date),
            _ => Err(PluckError::UnsupportedType(s.trim().to_string())),
        }
    }
}

impl FromStr for TargetType {
    type Err = PluckError;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim().to_ascii_lowercase();
        let (cardinality, inner) = if let Some(inner) = wrapped(&spec, "list") {
            (Cardinality::List, inner)
        } else if let Some(inner) = wrapped(&spec, "nullable") {
            (Cardinality::Nullable, inner)
        } else if let Some(inner) = spec.strip_suffix('?') {
            (Cardinality::Nullable, inner)
        } else {
            (Cardinality::Scalar, spec.as_str())
        };
        let kind = inner
            .parse()
            .map_err(|_| PluckError::UnsupportedType(s.trim().to_string()))?;
        Ok(TargetType { kind, cardinality })
    }
}

fn wrapped<'a>(spec: &'a str, keyword: &str) -> Option<&'a str> {
    spec.strip_prefix(keyword)
        .and_then(|rest| rest.trim_start().strip_prefix('<'))
        .and_then(|rest| rest.strip_suffix('>'))
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::SignedInt => "int",
            ScalarKind::UnsignedInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
            ScalarKind::Boolean => "bool",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Date => "date",
        })
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cardinality {
            Cardinality::Scalar => write!(f, "{}", self.kind),
            Cardinality::Nullable => write!(f, "nullable<{}>", self.kind),
            Cardinality::List => write!(f, "list<{}>", self.kind),
        }
    }
}

impl TryFrom<String> for ScalarKind {
    type Error = PluckError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ScalarKind> for String {
    fn from(kind: ScalarKind) -> String {
        kind.to_string()
    }
}

impl TryFrom<String> for TargetType {
    type Error = PluckError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TargetType> for String {
    fn from(target: TargetType) -> String {
        target.to_string()
    }
}

/// A dynamically typed extraction result.
///
/// Variant order matters to deserialization: more specific readings are
/// tried before `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Decimal(Decimal),
    Text(String),
    List(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Date(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Extractor {
    /// Extract into a runtime-described target.
    pub fn extract_value(&self, raw: impl fmt::Display, target: TargetType) -> Result<Value> {
        macro_rules! typed {
            ($ty:ty, $wrap:expr) => {{
                let wrap = $wrap;
                match target.cardinality {
                    Cardinality::Scalar => self.extract::<$ty>(raw).map(wrap),
                    Cardinality::Nullable => self
                        .extract::<Option<$ty>>(raw)
                        .map(|found| found.map_or(Value::Null, wrap)),
                    Cardinality::List => self
                        .extract::<Vec<$ty>>(raw)
                        .map(|found| Value::List(found.into_iter().map(wrap).collect())),
                }
            }};
        }

        match target.kind {
            ScalarKind::SignedInt => typed!(i64, Value::Int),
            ScalarKind::UnsignedInt => typed!(u64, Value::UInt),
            ScalarKind::Float => typed!(Decimal, Value::Decimal),
            ScalarKind::Text => typed!(String, Value::Text),
            ScalarKind::Boolean => typed!(bool, Value::Bool),
            ScalarKind::DateTime => typed!(NaiveDateTime, Value::DateTime),
            ScalarKind::Date => typed!(NaiveDate, Value::Date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target(spec: &str) -> TargetType {
        spec.parse().unwrap()
    }

    #[test]
    fn test_parses_bare_scalars_and_wrappers() {
        assert_eq!(target("int"), TargetType::scalar(ScalarKind::SignedInt));
        assert_eq!(target("string"), TargetType::scalar(ScalarKind::Text));
        assert_eq!(
            target("nullable<bool>"),
            TargetType::nullable(ScalarKind::Boolean)
        );
        assert_eq!(target("float?"), TargetType::nullable(ScalarKind::Float));
        assert_eq!(
            target("list<datetime>"),
            TargetType::list(ScalarKind::DateTime)
        );
        assert_eq!(target(" LIST<INT> "), TargetType::list(ScalarKind::SignedInt));
    }

    #[test]
    fn test_unknown_targets_are_unsupported() {
        let err = "quaternion".parse::<TargetType>().unwrap_err();
        assert!(matches!(err, PluckError::UnsupportedType(name) if name == "quaternion"));

        let err = "list<quaternion>".parse::<TargetType>().unwrap_err();
        assert!(matches!(err, PluckError::UnsupportedType(_)));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for spec in ["int", "uint", "float", "text", "bool", "nullable<date>", "list<datetime>"] {
            assert_eq!(target(spec).to_string(), spec);
        }
    }

    #[test]
    fn test_extracts_by_runtime_kind() {
        let extractor = Extractor::new();
        let text = "Hmmm... I would give it a 7.5 out of 10.";

        assert_eq!(
            extractor.extract_value(text, target("int")).unwrap(),
            Value::Int(8)
        );
        assert_eq!(
            extractor.extract_value(text, target("float")).unwrap(),
            Value::Decimal(Decimal::new(75, 1))
        );
        assert_eq!(
            extractor.extract_value("yes please", target("bool")).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_nullable_reports_null_and_list_collects() {
        let extractor = Extractor::new();

        assert_eq!(
            extractor
                .extract_value("no digits", target("nullable<int>"))
                .unwrap(),
            Value::Null
        );
        assert_eq!(
            extractor
                .extract_value("maybe", target("nullable<bool>"))
                .unwrap(),
            Value::Null
        );
        assert_eq!(
            extractor
                .extract_value("85 then 92", target("list<int>"))
                .unwrap(),
            Value::List(vec![Value::Int(85), Value::Int(92)])
        );
    }

    #[test]
    fn test_datetime_targets_use_the_format_pattern() {
        let extractor = Extractor::new().with_format("dd/MM/yyyy");
        let found = extractor
            .extract_value(
                "The date was 24/07/2018 but now its 01/08/2018!",
                target("list<datetime>"),
            )
            .unwrap();

        let expect = |y: i32, m: u32, d: u32| {
            Value::DateTime(
                chrono::NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
        };
        assert_eq!(found, Value::List(vec![expect(2018, 7, 24), expect(2018, 8, 1)]));

        let err = Extractor::new()
            .extract_value("24/07/2018", target("datetime"))
            .unwrap_err();
        assert!(matches!(err, PluckError::MissingFormat));
    }

    #[test]
    fn test_values_serialize_to_plain_json() {
        assert_eq!(serde_json::to_string(&Value::Int(8)).unwrap(), "8");
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Value::Decimal(Decimal::new(75, 1))).unwrap(),
            "\"7.5\""
        );
        assert_eq!(
            serde_json::to_string(&Value::List(vec![Value::Int(1), Value::Null])).unwrap(),
            "[1,null]"
        );
    }

    #[test]
    fn test_values_display_for_plain_output() {
        assert_eq!(Value::Int(8).to_string(), "8");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::List(vec![Value::Int(85), Value::Int(92)]).to_string(),
            "[85, 92]"
        );
        let at = chrono::NaiveDate::from_ymd_opt(2018, 7, 24)
            .unwrap()
            .and_hms_opt(1, 26, 0)
            .unwrap();
        assert_eq!(Value::DateTime(at).to_string(), "2018-07-24T01:26:00");
    }
}
