//! Natural-language to [`FilterSet`] translation.
//!
//! The translator recognizes a fixed set of English phrasings. It is not a
//! general parser: anything it does not recognize is simply left unset.
//!
//! Rules run over the lowercased, trimmed query in this order, and a later
//! rule overwrites a field set by an earlier one:
//!
//! 1. `palindrome` / `palindromic` sets `is_palindrome = true`.
//! 2. Word count: `single word` / `one word` (hyphen allowed) → 1, `two words`
//!    through `five words` → 2..5, `<N> word(s)` → N. First match wins.
//! 3. `longer than N`, `greater than N`, `more than N`, `over N` set
//!    `min_length = N + 1`.
//! 4. `shorter than N`, `less than N`, `under N` set `max_length = N - 1`.
//! 5. `exactly N characters` sets both bounds to N, overriding 3 and 4.
//! 6. `contain(s|ing) [the] [letter|character] <c>` sets `contains_character`.
//!    `has [the] [letter] <c>` is used only if that found nothing.
//! 7. Any mention of `vowel` sets `contains_character = 'a'`. This does not
//!    mean "contains any vowel"; it is a fixed stand-in for the first vowel.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::query::FilterSet;
use crate::{Error, Result};

/// A translated query as reported back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub original: String,
    pub parsed_filters: FilterSet,
}

struct Rules {
    word_counts: Vec<(Regex, Option<usize>)>,
    longer: Regex,
    shorter: Regex,
    exact: Regex,
    contains: Regex,
    has: Regex,
}

impl Rules {
    fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            word_counts: vec![
                (Regex::new(r"\b(?:single|one)[ -]word\b")?, Some(1)),
                (Regex::new(r"\btwo words\b")?, Some(2)),
                (Regex::new(r"\bthree words\b")?, Some(3)),
                (Regex::new(r"\bfour words\b")?, Some(4)),
                (Regex::new(r"\bfive words\b")?, Some(5)),
                (Regex::new(r"\b(\d+) words?\b")?, None),
            ],
            longer: Regex::new(r"\b(?:(?:longer|greater|more) than|over)\s+(\d+)")?,
            shorter: Regex::new(r"\b(?:(?:shorter|less) than|under)\s+(\d+)")?,
            exact: Regex::new(r"\bexactly\s+(\d+)\s+characters?\b")?,
            contains: Regex::new(
                r"\bcontain(?:s|ing)?\s+(?:the\s+)?(?:letter\s+|character\s+)?([a-z])\b",
            )?,
            has: Regex::new(r"\bhas\s+(?:the\s+)?(?:letter\s+)?([a-z])\b")?,
        })
    }
}

static RULES: Lazy<std::result::Result<Rules, regex::Error>> = Lazy::new(Rules::compile);

/// Extracts whatever filters the query expresses.
///
/// The result may be empty. Fails only when a number is out of range or a
/// bound cannot be satisfied by any length.
pub fn parse(query: &str) -> Result<FilterSet> {
    let rules = RULES
        .as_ref()
        .map_err(|e| Error::UnparsableQuery(format!("translator rules failed to compile: {}", e)))?;
    let q = query.trim().to_lowercase();
    let mut filters = FilterSet::default();

    if q.contains("palindrome") || q.contains("palindromic") {
        filters.is_palindrome = Some(true);
    }

    for (pattern, count) in &rules.word_counts {
        if let Some(caps) = pattern.captures(&q) {
            filters.word_count = match count {
                Some(n) => Some(*n),
                None => Some(capture_number(&caps)?),
            };
            break;
        }
    }

    if let Some(caps) = rules.longer.captures(&q) {
        let n = capture_number(&caps)?;
        filters.min_length = Some(n.checked_add(1).ok_or_else(|| out_of_range(n))?);
    }

    if let Some(caps) = rules.shorter.captures(&q) {
        let n = capture_number(&caps)?;
        let max = n.checked_sub(1).ok_or_else(|| {
            Error::UnparsableQuery("no string is shorter than 0 characters".to_string())
        })?;
        filters.max_length = Some(max);
    }

    if let Some(caps) = rules.exact.captures(&q) {
        let n = capture_number(&caps)?;
        filters.min_length = Some(n);
        filters.max_length = Some(n);
    }

    let letter = rules
        .contains
        .captures(&q)
        .or_else(|| rules.has.captures(&q))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next());
    if letter.is_some() {
        filters.contains_character = letter;
    }

    if q.contains("vowel") {
        filters.contains_character = Some('a');
    }

    Ok(filters)
}

/// Rejects self-contradictory filters. A consistent set comes back unchanged.
pub fn validate(filters: FilterSet) -> Result<FilterSet> {
    filters.validate()
}

/// Parses and validates `query`, requiring at least one usable filter.
pub fn translate(query: &str) -> Result<Interpretation> {
    if query.trim().is_empty() {
        return Err(Error::UnparsableQuery("query must not be empty".to_string()));
    }

    let parsed_filters = validate(parse(query)?)?;
    if parsed_filters.is_empty() {
        return Err(Error::UnparsableQuery(format!(
            "no recognizable filters in {:?}",
            query
        )));
    }

    log::debug!("translated query {:?} into {:?}", query, parsed_filters);
    Ok(Interpretation {
        original: query.to_string(),
        parsed_filters,
    })
}

fn capture_number(caps: &regex::Captures<'_>) -> Result<usize> {
    let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    digits
        .parse::<usize>()
        .map_err(|_| Error::UnparsableQuery(format!("number {} is out of range", digits)))
}

fn out_of_range(n: usize) -> Error {
    Error::UnparsableQuery(format!("number {} is out of range", n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(query: &str) -> FilterSet {
        parse(query).unwrap()
    }

    #[test]
    fn test_palindrome_and_exact_length() {
        assert_eq!(
            filters("strings that are palindromes and have exactly 5 characters"),
            FilterSet {
                is_palindrome: Some(true),
                min_length: Some(5),
                max_length: Some(5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_single_word_palindromic() {
        assert_eq!(
            filters("all single word palindromic strings"),
            FilterSet { is_palindrome: Some(true), word_count: Some(1), ..Default::default() }
        );
        assert_eq!(filters("One-Word strings").word_count, Some(1));
    }

    #[test]
    fn test_word_count_phrases() {
        assert_eq!(filters("strings with two words").word_count, Some(2));
        assert_eq!(filters("strings with three words").word_count, Some(3));
        assert_eq!(filters("strings with four words").word_count, Some(4));
        assert_eq!(filters("strings with five words").word_count, Some(5));
        assert_eq!(filters("strings with 12 words").word_count, Some(12));
        assert_eq!(filters("a 1 word string").word_count, Some(1));
        // First rule in the list wins.
        assert_eq!(filters("one word or 7 words").word_count, Some(1));
        assert_eq!(filters("someone wordy").word_count, None);
    }

    #[test]
    fn test_length_phrases_are_exclusive() {
        assert_eq!(filters("strings longer than 10 characters").min_length, Some(11));
        assert_eq!(filters("strings greater than 7 characters").min_length, Some(8));
        assert_eq!(filters("strings over 3 chars").min_length, Some(4));
        assert_eq!(filters("more than 0 characters").min_length, Some(1));
        assert_eq!(filters("strings shorter than 5 characters").max_length, Some(4));
        assert_eq!(filters("less than 20").max_length, Some(19));
        assert_eq!(filters("under 1 character").max_length, Some(0));
    }

    #[test]
    fn test_exact_length_overrides_bounds() {
        let f = filters("longer than 10 and shorter than 2 but exactly 7 characters");
        assert_eq!(f.min_length, Some(7));
        assert_eq!(f.max_length, Some(7));
        assert!(validate(f).is_ok());
    }

    #[test]
    fn test_contains_letter() {
        assert_eq!(filters("strings containing the letter z").contains_character, Some('z'));
        assert_eq!(filters("words that contain q").contains_character, Some('q'));
        assert_eq!(filters("contains the character x").contains_character, Some('x'));
        assert_eq!(filters("strings that has the letter k").contains_character, Some('k'));
        // "contain" followed by a word, not a letter.
        assert_eq!(filters("strings that contain apples").contains_character, None);
    }

    #[test]
    fn test_contains_takes_precedence_over_has() {
        assert_eq!(
            filters("has the letter b and contains the letter c").contains_character,
            Some('c')
        );
    }

    #[test]
    fn test_vowel_shortcut() {
        let f = filters("palindromic strings that contain the first vowel");
        assert_eq!(f.is_palindrome, Some(true));
        assert_eq!(f.contains_character, Some('a'));
        assert_eq!(filters("containing the letter z and a vowel").contains_character, Some('a'));
    }

    #[test]
    fn test_query_is_case_and_whitespace_insensitive() {
        assert_eq!(filters("  PALINDROMIC Strings LONGER THAN 3  "), filters("palindromic strings longer than 3"));
    }

    #[test]
    fn test_conflicting_bounds() {
        let f = filters("strings longer than 10 and shorter than 5 characters");
        assert_eq!(f.min_length, Some(11));
        assert_eq!(f.max_length, Some(4));
        assert!(matches!(validate(f), Err(Error::ConflictingFilters { .. })));

        let bad = FilterSet { min_length: Some(10), max_length: Some(3), ..Default::default() };
        assert!(matches!(
            validate(bad),
            Err(Error::ConflictingFilters { min_length: 10, max_length: 3 })
        ));
    }

    #[test]
    fn test_validate_keeps_consistent_filters() {
        for q in [
            "palindromes",
            "single word strings containing the letter a",
            "exactly 3 characters",
            "longer than 2 and shorter than 9",
        ] {
            let f = filters(q);
            assert_eq!(validate(f.clone()).unwrap(), f);
        }
    }

    #[test]
    fn test_unsatisfiable_and_overflowing_numbers() {
        assert!(matches!(parse("shorter than 0"), Err(Error::UnparsableQuery(_))));
        assert!(matches!(
            parse("longer than 999999999999999999999999999999"),
            Err(Error::UnparsableQuery(_))
        ));
    }

    #[test]
    fn test_translate() {
        let interp = translate("Single word palindromic strings").unwrap();
        assert_eq!(interp.original, "Single word palindromic strings");
        assert_eq!(interp.parsed_filters.word_count, Some(1));
        assert_eq!(interp.parsed_filters.is_palindrome, Some(true));

        assert!(matches!(translate(""), Err(Error::UnparsableQuery(_))));
        assert!(matches!(translate("   "), Err(Error::UnparsableQuery(_))));
        assert!(matches!(translate("show me everything"), Err(Error::UnparsableQuery(_))));
        assert!(matches!(
            translate("longer than 10 and shorter than 3"),
            Err(Error::ConflictingFilters { .. })
        ));
        assert_eq!(parse("show me everything").unwrap(), FilterSet::default());
    }
}
