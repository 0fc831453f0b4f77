//! Noise strippers for text that arrives with markup or unsafe characters.

use crate::tokens::TokenTable;

/// Remove every HTML tag, leaving the text between tags in place.
pub fn strip_html(text: &str) -> String {
    TokenTable::builtin()
        .html_tag()
        .replace_all(text, "")
        .into_owned()
}

/// Drop characters that Windows or POSIX filesystems refuse in file names,
/// along with control characters, then trim the result.
pub fn clean_filename(name: &str) -> String {
    const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    name.chars()
        .filter(|c| !RESERVED.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Keep only characters a person can type on a standard keyboard: printable
/// ASCII, newline, and tab.
pub fn retain_typable(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, ' '..='~') || c == '\n' || c == '\t')
        .collect()
}
