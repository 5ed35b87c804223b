use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::PropertySet;
use crate::{Error, Result, StringRecord};

/// Sparse match criteria applied against stored records.
///
/// Length bounds are inclusive. An absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Always stored lowercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl FilterSet {
    /// Builds a filter set from raw `GET /strings/` query parameters.
    ///
    /// Unknown parameters are ignored. Values that do not parse are an
    /// [`Error::InvalidRequest`].
    pub fn from_query_params(params: &HashMap<String, String>) -> Result<Self> {
        let mut filters = FilterSet::default();

        if let Some(raw) = params.get("is_palindrome") {
            filters.is_palindrome = Some(match raw.as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(Error::InvalidRequest(
                        "is_palindrome must be true or false".to_string(),
                    ))
                }
            });
        }
        filters.min_length = parse_count(params, "min_length")?;
        filters.max_length = parse_count(params, "max_length")?;
        filters.word_count = parse_count(params, "word_count")?;

        if let Some(raw) = params.get("contains_character") {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => filters.contains_character = c.to_lowercase().next(),
                _ => {
                    return Err(Error::InvalidRequest(
                        "contains_character must be a single character".to_string(),
                    ))
                }
            }
        }

        Ok(filters)
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSet::default()
    }

    /// Checks the set for internal consistency.
    ///
    /// Returns the set unchanged when both length bounds are absent or ordered.
    pub fn validate(self) -> Result<Self> {
        if let (Some(min_length), Some(max_length)) = (self.min_length, self.max_length) {
            if min_length > max_length {
                return Err(Error::ConflictingFilters { min_length, max_length });
            }
        }
        Ok(self)
    }

    pub fn matches(&self, properties: &PropertySet) -> bool {
        if let Some(want) = self.is_palindrome {
            if properties.is_palindrome != want {
                return false;
            }
        }
        if let Some(min) = self.min_length {
            if properties.length < min {
                return false;
            }
        }
        if let Some(max) = self.max_length {
            if properties.length > max {
                return false;
            }
        }
        if let Some(count) = self.word_count {
            if properties.word_count != count {
                return false;
            }
        }
        if let Some(c) = self.contains_character {
            if !properties.character_frequency_map.contains_key(&c) {
                return false;
            }
        }
        true
    }
}

/// Keeps the records whose properties satisfy `filters`, preserving order.
pub fn apply(records: Vec<StringRecord>, filters: &FilterSet) -> Vec<StringRecord> {
    records
        .into_iter()
        .filter(|r| filters.matches(&r.properties))
        .collect()
}

fn parse_count(params: &HashMap<String, String>, name: &str) -> Result<Option<usize>> {
    params
        .get(name)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| {
                Error::InvalidRequest(format!("{} must be a non-negative integer", name))
            })
        })
        .transpose()
}
