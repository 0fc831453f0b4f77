//! Positional string utilities shared by the pattern compiler and callers.

use crate::tokens::REGEX_METACHARACTERS;

/// Byte offset of the nth non-overlapping occurrence of `needle` in
/// `haystack`, counting from 1. Returns `None` when `needle` is empty, `n`
/// is zero, or there are fewer than `n` occurrences.
pub fn index_of_nth(haystack: &str, needle: &str, n: usize) -> Option<usize> {
    if needle.is_empty() || n == 0 {
        return None;
    }
    haystack.match_indices(needle).nth(n - 1).map(|(at, _)| at)
}

/// Replace only the nth occurrence of `needle`, counting from 1. The text
/// comes back unchanged when that occurrence does not exist.
pub fn replace_nth(haystack: &str, needle: &str, replacement: &str, n: usize) -> String {
    match index_of_nth(haystack, needle, n) {
        Some(at) => {
            let mut out = String::with_capacity(haystack.len() + replacement.len());
            out.push_str(&haystack[..at]);
            out.push_str(replacement);
            out.push_str(&haystack[at + needle.len()..]);
            out
        }
        None => haystack.to_string(),
    }
}

/// Replace every occurrence of `needle` except the first.
pub fn replace_all_but_first(haystack: &str, needle: &str, replacement: &str) -> String {
    match haystack.find(needle) {
        Some(at) => {
            let keep = at + needle.len();
            let mut out = String::with_capacity(haystack.len());
            out.push_str(&haystack[..keep]);
            out.push_str(&haystack[keep..].replace(needle, replacement));
            out
        }
        None => haystack.to_string(),
    }
}

/// Escape regex metacharacters so `raw` matches itself inside a pattern.
pub fn escape_regex(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        push_escaped(c, &mut out);
    }
    out
}

/// Whether `c` has a reserved meaning in a regex.
pub fn is_metacharacter(c: char) -> bool {
    REGEX_METACHARACTERS.contains(&c)
}

pub(crate) fn push_escaped(c: char, out: &mut String) {
    if is_metacharacter(c) {
        out.push('\\');
    }
    out.push(c);
}
