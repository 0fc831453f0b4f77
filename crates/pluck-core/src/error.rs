//! Error types for the pluck-core library.

use thiserror::Error;

/// Main error type for the pluck library.
#[derive(Error, Debug)]
pub enum PluckError {
    /// The format pattern produced no usable regex.
    #[error("invalid format pattern: '{0}'")]
    InvalidFormat(String),

    /// The requested target type has no extraction rule.
    #[error("unsupported target type: '{0}'")]
    UnsupportedType(String),

    /// A date/time target was requested without a format pattern.
    #[error("date/time extraction requires a format pattern")]
    MissingFormat,

    /// The input value could not be rendered as text.
    #[error("failed to render input as text")]
    StringConversion,

    /// A located match could not be converted to the target type.
    #[error("failed to parse '{value}' as {target}: {reason}")]
    Parse {
        value: String,
        target: &'static str,
        reason: String,
    },

    /// A caller-supplied regex failed to compile.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type for the pluck library.
pub type Result<T> = std::result::Result<T, PluckError>;
