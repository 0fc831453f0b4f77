//! Boolean target: whole-token matching against the true/false word lists.

use super::{Context, Scalar};
use crate::error::Result;

impl Scalar for bool {
    const TARGET: &'static str = "bool";

    fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
        Ok(cx
            .table()
            .word_run()
            .find_iter(text)
            .find_map(|run| cx.table().classify_bool(run.as_str())))
    }

    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
        Ok(cx
            .table()
            .word_run()
            .find_iter(text)
            .filter_map(|run| cx.table().classify_bool(run.as_str()))
            .collect())
    }

    fn fallback() -> Self {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenTable;
    use pretty_assertions::assert_eq;

    fn cx() -> Context<'static> {
        Context::new(TokenTable::builtin(), None)
    }

    #[test]
    fn test_affirmative_words_read_as_true() {
        assert_eq!(bool::first("yes please", &cx()).unwrap(), Some(true));
        assert_eq!(bool::first("it is TRUE", &cx()).unwrap(), Some(true));
        assert_eq!(bool::first("answer: 1", &cx()).unwrap(), Some(true));
    }

    #[test]
    fn test_negative_words_read_as_false() {
        assert_eq!(bool::first("Sadly, no.", &cx()).unwrap(), Some(false));
        assert_eq!(bool::first("F", &cx()).unwrap(), Some(false));
        assert_eq!(bool::first("count: 0", &cx()).unwrap(), Some(false));
    }

    #[test]
    fn test_unclassifiable_text_yields_nothing() {
        assert_eq!(bool::first("maybe", &cx()).unwrap(), None);
        assert_eq!(bool::first("", &cx()).unwrap(), None);
    }

    #[test]
    fn test_matching_is_whole_token_only() {
        // "not" contains "no" and "10" contains "1", neither should count.
        assert_eq!(bool::first("not applicable", &cx()).unwrap(), None);
        assert_eq!(bool::first("rated 10", &cx()).unwrap(), None);
        // Punctuation and underscores delimit tokens.
        assert_eq!(bool::first("_yes_", &cx()).unwrap(), Some(true));
        assert_eq!(bool::first("T.B.D.", &cx()).unwrap(), Some(true));
    }

    #[test]
    fn test_all_collects_every_classified_token() {
        let flags = bool::all("yes, no, unsure, TRUE", &cx()).unwrap();
        assert_eq!(flags, vec![true, false, true]);
    }
}
