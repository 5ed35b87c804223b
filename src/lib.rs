//! String Analyzer is a small, in-memory HTTP service for string analysis.
//!
//! Each submitted string is run through a deterministic analysis (length,
//! palindrome status, unique characters, word count, SHA-256 digest and a
//! character frequency table) and kept in a process-local store. Stored
//! strings can be read back, deleted, and filtered either with structured
//! criteria or with a handful of English phrasings.
//!
//! ## Core Components
//! - [`engine`]: The analysis engine and the in-memory record store.
//! - [`query`]: Structured filters and the natural-language translator.
//! - [`server`]: HTTP surface built on axum.
//! - [`config`]: Daemon configuration resolution.

pub mod config;
pub mod engine;
pub mod query;
pub mod server;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::PropertySet;

/// Errors returned by the String Analyzer.
#[derive(Error, Debug)]
pub enum Error {
    /// The submitted value is already stored.
    #[error("string already exists in the system")]
    DuplicateValue,
    /// No record exists for the requested value.
    #[error("string does not exist in the system")]
    NotFound,
    /// Length bounds are inverted after all filters were applied.
    #[error("conflicting filters: min_length {min_length} cannot be greater than max_length {max_length}")]
    ConflictingFilters { min_length: usize, max_length: usize },
    /// A natural-language query produced no usable filters.
    #[error("unable to parse natural language query: {0}")]
    UnparsableQuery(String),
    /// The request itself is malformed (bad JSON, missing field, bad parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The request is well formed but its content is not acceptable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
    /// An I/O error occurred while serving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for String Analyzer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// One analyzed string as held by a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringRecord {
    /// Full hex SHA-256 digest of `value`.
    pub id: String,
    /// The text exactly as submitted.
    pub value: String,
    pub properties: PropertySet,
    /// RFC 3339 UTC timestamp assigned at insertion.
    pub created_at: String,
}

/// The authoritative collection of analyzed strings.
///
/// Implementations hand out copies; callers never hold references into the
/// store's internal state.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reports whether a record with exactly this value is stored.
    async fn exists(&self, value: &str) -> Result<bool>;
    /// Inserts a new record, assigning its `id` and `created_at`.
    ///
    /// Fails with [`Error::DuplicateValue`] if the value is already present.
    /// The check and the insert happen under one lock.
    async fn add(&self, value: &str, properties: PropertySet) -> Result<StringRecord>;
    /// Looks a record up by its exact value.
    async fn get_by_value(&self, value: &str) -> Result<Option<StringRecord>>;
    /// Returns every record in insertion order.
    async fn list_all(&self) -> Result<Vec<StringRecord>>;
    /// Removes the record with this value. Returns `false` if none existed.
    async fn delete(&self, value: &str) -> Result<bool>;
}
