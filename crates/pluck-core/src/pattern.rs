//! Format-pattern compilation: turning date/time patterns such as
//! `dd/MM/yyyy HH:mm` into search regexes.

use tracing::debug;

use crate::error::{PluckError, Result};
use crate::text;
use crate::tokens::{FormatToken, TokenTable};

/// One consumed span of a format pattern.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Part {
    /// A table token.
    Token(&'static FormatToken),
    /// A pattern character carried through as a literal.
    Literal(char),
}

/// A format pattern compiled into a regex plus the parts that produced it.
///
/// Compilation walks the token table in priority order. Each token consumes
/// every still-free occurrence of its text in the pattern; characters no
/// token claimed become escaped literals. The fragments are then stitched
/// back together in pattern order and wrapped in a single capture group, so
/// the same regex works standalone and embedded in larger expressions.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: String,
    parts: Vec<(usize, Part)>,
}

impl CompiledPattern {
    /// Compile `pattern` against the token table.
    pub fn compile(pattern: &str, table: &TokenTable) -> Result<Self> {
        if pattern.is_empty() {
            return Err(PluckError::InvalidFormat(pattern.to_string()));
        }

        let mut consumed = vec![false; pattern.len()];
        let mut parts: Vec<(usize, Part)> = Vec::new();

        for token in table.tokens() {
            let mut occurrence = 1;
            while let Some(at) = text::index_of_nth(pattern, token.text, occurrence) {
                occurrence += 1;
                let span = at..at + token.text.len();
                if consumed[span.clone()].iter().any(|&taken| taken) {
                    continue;
                }
                consumed[span].fill(true);
                parts.push((at, Part::Token(token)));
            }
        }

        for (at, c) in pattern.char_indices() {
            if !consumed[at] {
                parts.push((at, Part::Literal(c)));
            }
        }

        parts.sort_by_key(|&(at, _)| at);

        let mut regex = String::from("(");
        for &(_, part) in &parts {
            match part {
                Part::Token(token) => regex.push_str(token.fragment),
                Part::Literal(c) => text::push_escaped(c, &mut regex),
            }
        }
        regex.push(')');

        debug!("compiled format pattern '{}' to {}", pattern, regex);
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            parts,
        })
    }

    /// The source format pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled regex text: every fragment in pattern order inside one
    /// capture group.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Like [`regex`](Self::regex), but with every field-bearing token
    /// wrapped in a named group so a match can be read back field by field.
    pub(crate) fn field_regex(&self) -> String {
        let mut out = String::from("(");
        for (i, &(_, part)) in self.parts.iter().enumerate() {
            match part {
                Part::Token(token) if token.kind.is_field() => {
                    out.push_str("(?P<");
                    out.push_str(&field_name(i));
                    out.push('>');
                    out.push_str(token.fragment);
                    out.push(')');
                }
                Part::Token(token) => out.push_str(token.fragment),
                Part::Literal(c) => text::push_escaped(c, &mut out),
            }
        }
        out.push(')');
        out
    }

    /// Consumed parts sorted by their position in the pattern.
    pub(crate) fn parts(&self) -> &[(usize, Part)] {
        &self.parts
    }
}

/// Capture-group name for the part at `index`.
pub(crate) fn field_name(index: usize) -> String {
    format!("f{index}")
}
