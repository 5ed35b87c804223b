use std::sync::Arc;

use log::{debug, info};

use crate::engine::analyze;
use crate::query::{self, FilterSet, Interpretation};
use crate::{Error, RecordStore, Result, StringRecord};

/// Default cap on submitted value length, in characters.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 10_000;

/// Strings inserted by [`StringRegistry::seed_samples`].
pub const SAMPLE_STRINGS: &[&str] = &[
    "hello world",
    "madam",
    "racecar",
    "test string",
    "a",
    "python programming",
];

/// Ties the analysis engine, the filter pipeline and a [`RecordStore`]
/// together into the operations the HTTP surface exposes.
pub struct StringRegistry {
    store: Arc<dyn RecordStore>,
    max_value_length: usize,
}

impl StringRegistry {
    pub fn new(store: Arc<dyn RecordStore>, max_value_length: usize) -> Self {
        Self { store, max_value_length }
    }

    pub fn max_value_length(&self) -> usize {
        self.max_value_length
    }

    /// Analyzes and stores `value`.
    ///
    /// Nothing is stored unless analysis and insertion both succeed.
    pub async fn create(&self, value: &str) -> Result<StringRecord> {
        let length = value.chars().count();
        if length > self.max_value_length {
            return Err(Error::InvalidInput(format!(
                "value is {} characters long, the limit is {}",
                length, self.max_value_length
            )));
        }
        if self.store.exists(value).await? {
            debug!("rejecting duplicate value of length {}", length);
            return Err(Error::DuplicateValue);
        }

        let record = self.store.add(value, analyze(value)).await?;
        info!("stored string {}", record.id);
        Ok(record)
    }

    pub async fn get(&self, value: &str) -> Result<StringRecord> {
        self.store.get_by_value(value).await?.ok_or(Error::NotFound)
    }

    /// Lists stored records matching `filters`, in insertion order.
    pub async fn list(&self, filters: &FilterSet) -> Result<Vec<StringRecord>> {
        let filters = filters.clone().validate()?;
        let records = self.store.list_all().await?;
        Ok(query::apply(records, &filters))
    }

    /// Translates `query` and lists the records it selects.
    pub async fn filter_natural_language(
        &self,
        query: &str,
    ) -> Result<(Interpretation, Vec<StringRecord>)> {
        let interpretation = query::translate(query)?;
        let records = self.list(&interpretation.parsed_filters).await?;
        Ok((interpretation, records))
    }

    pub async fn delete(&self, value: &str) -> Result<()> {
        if self.store.delete(value).await? {
            info!("deleted string {}", crate::engine::content_id(value));
            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }

    /// Inserts [`SAMPLE_STRINGS`], skipping any already present.
    /// Returns how many were added.
    pub async fn seed_samples(&self) -> Result<usize> {
        let mut added = 0;
        for sample in SAMPLE_STRINGS {
            match self.create(sample).await {
                Ok(_) => added += 1,
                Err(Error::DuplicateValue) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemStore;

    fn registry() -> StringRegistry {
        StringRegistry::new(Arc::new(MemStore::new()), DEFAULT_MAX_VALUE_LENGTH)
    }

    #[tokio::test]
    async fn test_create_then_get_matches_analysis() {
        let reg = registry();
        let created = reg.create("abc").await.unwrap();
        let got = reg.get("abc").await.unwrap();

        assert_eq!(got.properties, analyze("abc"));
        assert_eq!(got, created);
        assert_eq!(got.id, analyze("abc").sha256_hash);
    }

    #[tokio::test]
    async fn test_create_twice_is_duplicate() {
        let reg = registry();
        reg.create("abc").await.unwrap();
        assert!(matches!(reg.create("abc").await, Err(Error::DuplicateValue)));
        // Exact match only.
        reg.create("ABC").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let reg = registry();
        reg.create("abc").await.unwrap();
        reg.delete("abc").await.unwrap();

        assert!(matches!(reg.get("abc").await, Err(Error::NotFound)));
        assert!(matches!(reg.delete("abc").await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_string_is_valid() {
        let reg = registry();
        let record = reg.create("").await.unwrap();
        assert_eq!(record.properties.length, 0);
        assert_eq!(record.properties.word_count, 0);
        assert!(record.properties.is_palindrome);
    }

    #[tokio::test]
    async fn test_max_value_length() {
        let reg = StringRegistry::new(Arc::new(MemStore::new()), 5);
        reg.create("12345").await.unwrap();
        assert!(matches!(reg.create("123456").await, Err(Error::InvalidInput(_))));
        assert!(matches!(reg.get("123456").await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_list_filters_palindromes() {
        let reg = registry();
        reg.create("madam").await.unwrap();
        reg.create("hello").await.unwrap();

        let filters = FilterSet { is_palindrome: Some(true), ..Default::default() };
        let values: Vec<String> = reg.list(&filters).await.unwrap().into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["madam"]);

        assert_eq!(reg.list(&FilterSet::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_bounds() {
        let reg = registry();
        let filters = FilterSet { min_length: Some(10), max_length: Some(3), ..Default::default() };
        assert!(matches!(reg.list(&filters).await, Err(Error::ConflictingFilters { .. })));
    }

    #[tokio::test]
    async fn test_filter_natural_language() {
        let reg = registry();
        reg.seed_samples().await.unwrap();

        let (interp, records) = reg
            .filter_natural_language("single word palindromic strings")
            .await
            .unwrap();
        assert_eq!(interp.parsed_filters.word_count, Some(1));
        let values: Vec<String> = records.into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["madam", "racecar", "a"]);

        let (_, records) = reg
            .filter_natural_language("strings longer than 10 characters")
            .await
            .unwrap();
        let values: Vec<String> = records.into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["hello world", "test string", "python programming"]);
    }

    #[tokio::test]
    async fn test_seed_samples_is_repeatable() {
        let reg = registry();
        assert_eq!(reg.seed_samples().await.unwrap(), SAMPLE_STRINGS.len());
        assert_eq!(reg.seed_samples().await.unwrap(), 0);
        assert_eq!(reg.list(&FilterSet::default()).await.unwrap().len(), SAMPLE_STRINGS.len());
    }
}
