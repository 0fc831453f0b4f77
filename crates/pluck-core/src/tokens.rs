//! Curated token table and search templates for text extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// What a format token contributes to a date/time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    DateSeparator,
    TimeSeparator,
    UtcOffset,
    Year,
    Meridiem,
    Second,
    Minute,
    MonthName,
    Month,
    Hour24,
    Hour12,
    Era,
    Fraction,
    DayName,
    Day,
}

impl TokenKind {
    /// Whether a match for this token carries a date/time field value.
    pub fn is_field(self) -> bool {
        !matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::DateSeparator
                | TokenKind::TimeSeparator
                | TokenKind::UtcOffset
                | TokenKind::Era
                | TokenKind::DayName
        )
    }
}

/// One entry of the format token table: the pattern text it consumes and the
/// regex fragment it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatToken {
    pub text: &'static str,
    pub fragment: &'static str,
    pub kind: TokenKind,
}

const fn t(text: &'static str, fragment: &'static str, kind: TokenKind) -> FormatToken {
    FormatToken {
        text,
        fragment,
        kind,
    }
}

/// The format token table, tried positionally from first to last.
///
/// Longer spellings of a unit sit before their shorter forms so that `yyyy`
/// wins over `y` without any longest-match machinery. Do not reorder.
pub const FORMAT_TOKENS: &[FormatToken] = &[
    t(" ", r"\s", TokenKind::Whitespace),
    t("/", "[/.-]", TokenKind::DateSeparator),
    t(":", "[:.]", TokenKind::TimeSeparator),
    t("zzz", "[+-][0-9]{2}:[0-9]{2}", TokenKind::UtcOffset),
    t("zz", "[+-][0-9]{2}", TokenKind::UtcOffset),
    t("z", "[+-][0-9]", TokenKind::UtcOffset),
    t("yyyy", "[0-9]{4}", TokenKind::Year),
    t("yyy", "[0-9]{3,4}", TokenKind::Year),
    t("yy", "[0-9]{2}", TokenKind::Year),
    t("y", "([1-9][0-9]|[0-9])", TokenKind::Year),
    t("tt", "(PM|AM)", TokenKind::Meridiem),
    t("t", "[PA]", TokenKind::Meridiem),
    t("ss", "[0-5][0-9]", TokenKind::Second),
    t("s", "([1-5][0-9]|[0-9])", TokenKind::Second),
    t("MMMM", "([A-Za-z]{3,9})?", TokenKind::MonthName),
    t("MMM", "([A-Za-z]{3})?", TokenKind::MonthName),
    t("MM", "(1[0-2]|0[1-9])", TokenKind::Month),
    t("M", "(1[0-2]|[1-9])", TokenKind::Month),
    t("mm", "[0-5][0-9]", TokenKind::Minute),
    t("m", "([1-5][0-9]|[0-9])", TokenKind::Minute),
    t("K", "[+-][0-9]{2}:[0-9]{2}", TokenKind::UtcOffset),
    t("HH", "(2[0-3]|1[0-9]|0[0-9])", TokenKind::Hour24),
    t("H", "(2[0-3]|1[0-9]|[0-9])", TokenKind::Hour24),
    t("hh", "(1[0-2]|0[1-9])", TokenKind::Hour12),
    t("h", "(1[0-2]|[1-9])", TokenKind::Hour12),
    t("gg", "[A-B].?[C-D].?", TokenKind::Era),
    t("g", "[A-B].?[C-D].?", TokenKind::Era),
    t("FFFFFFF", "[1-9][0-9]{5}[1-9]", TokenKind::Fraction),
    t("FFFFFF", "[1-9][0-9]{4}[1-9]", TokenKind::Fraction),
    t("FFFFF", "[1-9][0-9]{3}[1-9]", TokenKind::Fraction),
    t("FFFF", "[1-9][0-9]{2}[1-9]", TokenKind::Fraction),
    t("FFF", "[1-9][0-9][1-9]", TokenKind::Fraction),
    t("FF", "[1-9]{2}", TokenKind::Fraction),
    t("F", "[1-9]", TokenKind::Fraction),
    t("fffffff", "[0-9]{7}", TokenKind::Fraction),
    t("ffffff", "[0-9]{6}", TokenKind::Fraction),
    t("fffff", "[0-9]{5}", TokenKind::Fraction),
    t("ffff", "[0-9]{4}", TokenKind::Fraction),
    t("fff", "[0-9]{3}", TokenKind::Fraction),
    t("ff", "[0-9]{2}", TokenKind::Fraction),
    t("f", "[0-9]", TokenKind::Fraction),
    t("dddd", "[A-Za-z]{6,9}", TokenKind::DayName),
    t("ddd", "[A-Za-z]{3}", TokenKind::DayName),
    t("dd", "[0-3][0-9]", TokenKind::Day),
    t("d", "([1-3][0-9]|[1-9])", TokenKind::Day),
];

/// Words that read as true, matched as whole tokens, case-insensitive.
pub const TRUE_WORDS: &[&str] = &["TRUE", "T", "YES", "Y", "1"];

/// Words that read as false.
pub const FALSE_WORDS: &[&str] = &["FALSE", "F", "NO", "N", "0"];

/// Characters escaped when a pattern character is carried into the regex
/// as a literal.
pub const REGEX_METACHARACTERS: &[char] = &[
    '\\', '^', '$', '.', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}',
];

/// Signed number: optional minus, digits with embedded thousands separators,
/// optional decimal fraction. Never starts or ends on a separator.
pub const NUMBER_TEMPLATE: &str = r"-?[0-9](?:[0-9,]*[0-9])?(?:\.[0-9]+)?";

/// Non-negative, non-decimal number.
pub const UNSIGNED_NUMBER_TEMPLATE: &str = r"[0-9](?:[0-9,]*[0-9])?";

/// Maximal alphanumeric run; the unit of whole-token boolean matching.
pub const WORD_RUN_TEMPLATE: &str = "[A-Za-z0-9]+";

/// Email address.
pub const EMAIL_TEMPLATE: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Phone number: optional country code, optional parenthesized area code,
/// six to fourteen digits with single space or dash separators.
pub const PHONE_TEMPLATE: &str =
    r"(?:\+[0-9]{1,3}[\s-]?)?(?:\([0-9]{1,4}\)[\s-]?)?[0-9](?:[\s-]?[0-9]){5,13}";

/// HTML tag, including DOCTYPE declarations and attribute lists.
pub const HTML_TAG_TEMPLATE: &str =
    r#"</?(!(?:DOCTYPE|doctype).+?|\w+((\s+\w+(\s*=\s*(?:".*?"|'.*?'|[^'">\s]+))?)+\s*|\s*))/?>"#;

lazy_static! {
    static ref BUILTIN: TokenTable = TokenTable {
        tokens: FORMAT_TOKENS,
        true_words: TRUE_WORDS,
        false_words: FALSE_WORDS,
        number: Regex::new(NUMBER_TEMPLATE).unwrap(),
        unsigned_number: Regex::new(UNSIGNED_NUMBER_TEMPLATE).unwrap(),
        word_run: Regex::new(WORD_RUN_TEMPLATE).unwrap(),
        html_tag: Regex::new(HTML_TAG_TEMPLATE).unwrap(),
    };
}

/// Immutable extraction configuration: the ordered format token table, the
/// boolean word lists, and the compiled search templates.
///
/// Everything that locates values in text takes this by reference;
/// [`TokenTable::builtin`] returns the curated table the convenience
/// functions use.
#[derive(Debug)]
pub struct TokenTable {
    tokens: &'static [FormatToken],
    true_words: &'static [&'static str],
    false_words: &'static [&'static str],
    number: Regex,
    unsigned_number: Regex,
    word_run: Regex,
    html_tag: Regex,
}

impl TokenTable {
    /// The curated built-in table.
    pub fn builtin() -> &'static TokenTable {
        &BUILTIN
    }

    /// Format tokens in match-priority order.
    pub fn tokens(&self) -> &'static [FormatToken] {
        self.tokens
    }

    /// Compiled signed number template.
    pub fn number(&self) -> &Regex {
        &self.number
    }

    /// Compiled unsigned number template.
    pub fn unsigned_number(&self) -> &Regex {
        &self.unsigned_number
    }

    /// Compiled alphanumeric-run template.
    pub fn word_run(&self) -> &Regex {
        &self.word_run
    }

    /// Compiled HTML tag template.
    pub fn html_tag(&self) -> &Regex {
        &self.html_tag
    }

    /// Classify a whole token against the boolean word lists.
    pub fn classify_bool(&self, word: &str) -> Option<bool> {
        if self.true_words.iter().any(|w| w.eq_ignore_ascii_case(word)) {
            Some(true)
        } else if self.false_words.iter().any(|w| w.eq_ignore_ascii_case(word)) {
            Some(false)
        } else {
            None
        }
    }
}
