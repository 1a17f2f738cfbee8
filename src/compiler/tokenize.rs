//! Constraint tokenization.
//!
//! User rules are opaque strings such as `gate_A NEXTTO gate_B` or
//! `STARTSWITH pTac`. The compiler never parses them; it only needs to know
//! which entities a rule mentions so it can decide where the rule belongs.
//! That is done by splitting the rule into tokens and discarding the Eugene
//! keyword vocabulary. Whatever remains and starts with a letter is taken as
//! a name.
//!
//! The filter is conservative. An unknown word that is not a keyword is
//! treated as a name, so a rule can be rejected for mentioning something that
//! is not really an entity. It will never be attached to a device it does not
//! fully refer to.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Eugene keywords, upper case. Matching is case-insensitive.
const KEYWORDS: &[&str] = &[
    // counting
    "CONTAINS",
    "NOTCONTAINS",
    "EXACTLY",
    "NOTEXACTLY",
    "MORETHAN",
    "NOTMORETHAN",
    "SAME_COUNT",
    "WITH",
    "NOTWITH",
    "THEN",
    // positioning
    "STARTSWITH",
    "ENDSWITH",
    "AFTER",
    "ALL_AFTER",
    "SOME_AFTER",
    "BEFORE",
    "ALL_BEFORE",
    "SOME_BEFORE",
    "NEXTTO",
    "ALL_NEXTTO",
    "SOME_NEXTTO",
    // pairing
    "EQUALS",
    "NOTEQUALS",
    // orientation
    "FORWARD",
    "ALL_FORWARD",
    "REVERSE",
    "ALL_REVERSE",
    "SAME_ORIENTATION",
    "ALL_SAME_ORIENTATION",
    "ALTERNATE_ORIENTATION",
    // interaction
    "REPRESSES",
    "INDUCES",
    "DRIVES",
    // logic
    "NOT",
    "AND",
    "OR",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| KEYWORDS.iter().copied().collect());

pub(crate) const STARTSWITH: &str = "STARTSWITH";

/// Split a line into tokens on whitespace and `, ; ( ) "`.
pub fn tokenize(line: &str) -> Vec<&str> {
    regex!(r#"[\s,;()"]+"#).split(line).filter(|token| !token.is_empty()).collect()
}

pub(crate) fn is_keyword(token: &str) -> bool {
    KEYWORD_SET.contains(token.to_ascii_uppercase().as_str())
}

/// Names referenced by `rule`, in order of appearance.
///
/// ```
/// use gatelayout::referenced_names;
///
/// assert_eq!(referenced_names("gate_A NEXTTO gate_B"), vec!["gate_A", "gate_B"]);
/// assert!(referenced_names("[0] EQUALS").is_empty());
/// ```
pub fn referenced_names(rule: &str) -> Vec<&str> {
    tokenize(rule)
        .into_iter()
        .filter(|token| !is_keyword(token))
        .filter(|token| token.chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
        .collect()
}

/// Whether `rule` pins the start of its device.
pub(crate) fn is_starts_with(rule: &str) -> bool {
    tokenize(rule).iter().any(|token| token.eq_ignore_ascii_case(STARTSWITH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_alone_reference_nothing() {
        let all = KEYWORDS.join(" ");
        assert!(referenced_names(&all).is_empty());
        assert!(referenced_names(&all.to_lowercase()).is_empty());
        assert!(referenced_names("Not Contains exactly All_Forward").is_empty());
    }

    #[test]
    fn names_in_compound_rule() {
        let names = referenced_names("gateA CONTAINS p1 AND gateB CONTAINS p2");
        assert_eq!(names, vec!["gateA", "p1", "gateB", "p2"]);
    }

    #[test]
    fn numeric_and_index_tokens_are_not_names() {
        assert_eq!(referenced_names("[0] EQUALS s1"), vec!["s1"]);
        assert_eq!(referenced_names("pTac EXACTLY 2"), vec!["pTac"]);
        assert_eq!(referenced_names("_hidden BEFORE pBad"), vec!["pBad"]);
    }

    #[test]
    fn tokenizer_splits_on_punctuation() {
        assert_eq!(tokenize("  Device d(a, b);\t"), vec!["Device", "d", "a", "b"]);
        assert!(tokenize(" ,; ").is_empty());
    }

    #[test]
    fn unknown_words_are_kept() {
        assert_eq!(referenced_names("pA SOMEWHERE pB"), vec!["pA", "SOMEWHERE", "pB"]);
    }

    #[test]
    fn starts_with_detection_ignores_case() {
        assert!(is_starts_with("STARTSWITH pTac"));
        assert!(is_starts_with("startswith pTac"));
        assert!(!is_starts_with("pTac BEFORE pBad"));
        assert!(!is_starts_with("pNOTSTARTSWITHx BEFORE pBad"));
    }
}
