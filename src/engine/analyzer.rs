use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Properties derived from a single string.
///
/// Everything is computed from the value exactly as submitted: nothing is
/// trimmed or normalized unless a field says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Number of characters (Unicode scalar values).
    pub length: usize,
    /// ASCII letters and digits only, case-insensitive. No such content counts as a palindrome.
    pub is_palindrome: bool,
    /// Distinct characters after lowercasing. Whitespace and punctuation count.
    pub unique_characters: usize,
    /// Whitespace-delimited tokens.
    pub word_count: usize,
    /// Lowercase hex SHA-256 of the UTF-8 bytes.
    pub sha256_hash: String,
    /// Occurrences of each character after lowercasing.
    pub character_frequency_map: BTreeMap<char, usize>,
}

/// Runs the full analysis over `value`.
///
/// Pure and deterministic. The empty string is valid input.
pub fn analyze(value: &str) -> PropertySet {
    let lowered = value.to_lowercase();

    PropertySet {
        length: value.chars().count(),
        is_palindrome: is_palindrome(value),
        unique_characters: lowered.chars().collect::<HashSet<_>>().len(),
        word_count: value.split_whitespace().count(),
        sha256_hash: content_id(value),
        character_frequency_map: character_frequency(&lowered),
    }
}

/// Hex SHA-256 of `value`. Doubles as the record id.
pub fn content_id(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn is_palindrome(value: &str) -> bool {
    let normalized: Vec<char> = value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    normalized.iter().eq(normalized.iter().rev())
}

fn character_frequency(lowered: &str) -> BTreeMap<char, usize> {
    let mut frequency = BTreeMap::new();
    for c in lowered.chars() {
        *frequency.entry(c).or_insert(0) += 1;
    }
    frequency
}
