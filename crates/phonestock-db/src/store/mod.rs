//! # Document Store
//!
//! The seam between the search index and whatever holds the documents.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DocumentStore                                        │
//! │                                                                         │
//! │  get(collection, key)                      → Option<StoredDocument>     │
//! │  query(collection, filters)                → Vec<StoredDocument>        │
//! │  query_page(collection, filters, off, lim) → Vec<StoredDocument>        │
//! │  count(collection, filters)                → u64                        │
//! │  list(collection)                          → Vec<StoredDocument>        │
//! │  put(collection, key, fields)              → ()                         │
//! │  delete(collection, key)                   → bool                       │
//! │                                                                         │
//! │  filters = conjunction of field == string value                        │
//! │  order   = native insertion order, stable across overwrites            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//! - [`sqlite::SqliteDocumentStore`] - documents as JSON rows in SQLite
//! - [`memory::MemoryStore`] - insertion-ordered maps, for tests and demos

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use phonestock_core::document::Fields;
use phonestock_core::{StoredDocument, ValidationError};

use crate::error::DbResult;

// =============================================================================
// Field Filter
// =============================================================================

/// An equality condition on a top-level document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    /// `field == value`.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        FieldFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Checks the filter against a document; only string fields can match.
    pub fn matches(&self, fields: &Fields) -> bool {
        fields
            .get(&self.field)
            .and_then(|value| value.as_str())
            .is_some_and(|value| value == self.value)
    }

    /// Field names end up inside JSON paths, so only identifier
    /// characters are accepted.
    pub fn validate(&self) -> DbResult<()> {
        let valid = !self.field.is_empty()
            && self
                .field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidFormat {
                field: "filter field".to_string(),
                reason: format!("'{}' is not an identifier", self.field),
            }
            .into())
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Abstract document store.
///
/// All failures surface as `DbError`; implementations never retry and never
/// turn a failure into an empty result.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document by storage key.
    async fn get(&self, collection: &str, key: &str) -> DbResult<Option<StoredDocument>>;

    /// Fetches every document matching all filters, in native order.
    async fn query(&self, collection: &str, filters: &[FieldFilter])
        -> DbResult<Vec<StoredDocument>>;

    /// Fetches one native page of matching documents.
    async fn query_page(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        offset: u64,
        limit: u32,
    ) -> DbResult<Vec<StoredDocument>>;

    /// Counts documents matching all filters.
    async fn count(&self, collection: &str, filters: &[FieldFilter]) -> DbResult<u64>;

    /// Fetches every document of a collection, in native order.
    async fn list(&self, collection: &str) -> DbResult<Vec<StoredDocument>> {
        self.query(collection, &[]).await
    }

    /// Inserts or overwrites a document. Overwrites keep their position.
    async fn put(&self, collection: &str, key: &str, fields: Fields) -> DbResult<()>;

    /// Deletes a document, returning whether it existed.
    async fn delete(&self, collection: &str, key: &str) -> DbResult<bool>;
}
