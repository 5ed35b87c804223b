use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::engine::{content_id, PropertySet};
use crate::{Error, RecordStore, Result, StringRecord};

/// Process-local [`RecordStore`] backed by a single lock-guarded list.
///
/// Records stay in insertion order. Lookups are linear in the record count.
#[derive(Default)]
pub struct MemStore {
    records: RwLock<Vec<StringRecord>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<StringRecord>>> {
        self.records
            .read()
            .map_err(|_| Error::Internal("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<StringRecord>>> {
        self.records
            .write()
            .map_err(|_| Error::Internal("record store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn exists(&self, value: &str) -> Result<bool> {
        let records = self.read()?;
        Ok(records.iter().any(|r| r.value == value))
    }

    async fn add(&self, value: &str, properties: PropertySet) -> Result<StringRecord> {
        let mut records = self.write()?;
        if records.iter().any(|r| r.value == value) {
            return Err(Error::DuplicateValue);
        }

        let record = StringRecord {
            id: content_id(value),
            value: value.to_string(),
            properties,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn get_by_value(&self, value: &str) -> Result<Option<StringRecord>> {
        let records = self.read()?;
        Ok(records.iter().find(|r| r.value == value).cloned())
    }

    async fn list_all(&self) -> Result<Vec<StringRecord>> {
        Ok(self.read()?.clone())
    }

    async fn delete(&self, value: &str) -> Result<bool> {
        let mut records = self.write()?;
        match records.iter().position(|r| r.value == value) {
            Some(idx) => {
                records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
