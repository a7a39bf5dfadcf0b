//! In-memory [`DocumentStore`] for tests and demos.
//!
//! Collections are insertion-ordered maps behind a `tokio::sync::RwLock`.
//! [`MemoryStore::set_unavailable`] makes every call fail with
//! `DbError::StoreUnavailable`, standing in for a store outage.
//! Every read that reaches the store is recorded; see [`MemoryStore::reads_since`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use phonestock_core::document::Fields;
use phonestock_core::StoredDocument;

use super::{DocumentStore, FieldFilter};
use crate::error::{DbError, DbResult};

#[derive(Default)]
struct Collection {
    /// seq → document; seq order is the native order.
    by_seq: BTreeMap<u64, StoredDocument>,
    seq_of: HashMap<String, u64>,
}

/// Which [`DocumentStore`] read was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    Get,
    Query,
    QueryPage,
    Count,
}

/// One served read. `list` shows up as a `Query` with no filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
    pub kind: ReadKind,
    pub collection: String,
    pub filters: Vec<FieldFilter>,
}

impl ReadCall {
    /// True if any filter is `field == value`.
    pub fn has_filter(&self, field: &str, value: &str) -> bool {
        self.filters
            .iter()
            .any(|filter| filter.field == field && filter.value == value)
    }
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    next_seq: AtomicU64,
    unavailable: AtomicBool,
    reads: Mutex<Vec<ReadCall>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage (`true`) or recovery (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of read calls served so far.
    pub fn read_count(&self) -> u64 {
        self.read_log().len() as u64
    }

    /// Reads served after the first `since` calls.
    pub fn reads_since(&self, since: u64) -> Vec<ReadCall> {
        self.read_log()
            .iter()
            .skip(since as usize)
            .cloned()
            .collect()
    }

    fn read_log(&self) -> MutexGuard<'_, Vec<ReadCall>> {
        self.reads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::StoreUnavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    fn begin_read(
        &self,
        kind: ReadKind,
        collection: &str,
        filters: &[FieldFilter],
    ) -> DbResult<()> {
        self.check_available()?;
        self.read_log().push(ReadCall {
            kind,
            collection: collection.to_string(),
            filters: filters.to_vec(),
        });
        Ok(())
    }

    async fn matching(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> DbResult<Vec<StoredDocument>> {
        for filter in filters {
            filter.validate()?;
        }
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| {
                c.by_seq
                    .values()
                    .filter(|doc| filters.iter().all(|f| f.matches(&doc.fields)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> DbResult<Option<StoredDocument>> {
        self.begin_read(ReadKind::Get, collection, &[])?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| {
            c.seq_of
                .get(key)
                .and_then(|seq| c.by_seq.get(seq))
                .cloned()
        }))
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> DbResult<Vec<StoredDocument>> {
        self.begin_read(ReadKind::Query, collection, filters)?;
        self.matching(collection, filters).await
    }

    async fn query_page(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        offset: u64,
        limit: u32,
    ) -> DbResult<Vec<StoredDocument>> {
        self.begin_read(ReadKind::QueryPage, collection, filters)?;
        Ok(self
            .matching(collection, filters)
            .await?
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, collection: &str, filters: &[FieldFilter]) -> DbResult<u64> {
        self.begin_read(ReadKind::Count, collection, filters)?;
        Ok(self.matching(collection, filters).await?.len() as u64)
    }

    async fn put(&self, collection: &str, key: &str, fields: Fields) -> DbResult<()> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let c = collections.entry(collection.to_string()).or_default();

        let seq = match c.seq_of.get(key) {
            Some(seq) => *seq,
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                c.seq_of.insert(key.to_string(), seq);
                seq
            }
        };
        c.by_seq.insert(seq, StoredDocument::new(key, fields));
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> DbResult<bool> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match c.seq_of.remove(key) {
            Some(seq) => {
                c.by_seq.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        StoredDocument::from_value("", value).fields
    }

    #[tokio::test]
    async fn test_native_order_survives_overwrite() {
        let store = MemoryStore::new();
        store.put("c", "b", fields(json!({ "n": "1" }))).await.unwrap();
        store.put("c", "a", fields(json!({ "n": "2" }))).await.unwrap();
        store.put("c", "b", fields(json!({ "n": "3" }))).await.unwrap();

        let docs = store.list("c").await.unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(docs[0].str_field("n"), "3");
    }

    #[tokio::test]
    async fn test_paging_and_count() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .put("c", &format!("k{i}"), fields(json!({ "w": "W1" })))
                .await
                .unwrap();
        }
        let filter = [FieldFilter::eq("w", "W1")];
        assert_eq!(store.count("c", &filter).await.unwrap(), 5);

        let page = store.query_page("c", &filter, 4, 3).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].key, "k4");
    }

    #[tokio::test]
    async fn test_outage_fails_every_call() {
        let store = MemoryStore::new();
        store.put("c", "k", Fields::new()).await.unwrap();
        store.set_unavailable(true);

        assert!(matches!(
            store.get("c", "k").await,
            Err(DbError::StoreUnavailable(_))
        ));
        assert!(store.count("c", &[]).await.is_err());
        assert!(store.put("c", "k2", Fields::new()).await.is_err());

        store.set_unavailable(false);
        assert!(store.get("c", "k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reads_are_recorded() {
        let store = MemoryStore::new();
        store.put("c", "k", fields(json!({ "w": "W1" }))).await.unwrap();
        assert_eq!(store.read_count(), 0);

        store.get("c", "k").await.unwrap();
        let mark = store.read_count();
        store.list("c").await.unwrap();
        store
            .query_page("c", &[FieldFilter::eq("w", "W1")], 0, 5)
            .await
            .unwrap();

        let reads = store.reads_since(mark);
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].kind, ReadKind::Query);
        assert!(reads[0].filters.is_empty());
        assert_eq!(reads[1].kind, ReadKind::QueryPage);
        assert!(reads[1].has_filter("w", "W1"));
        assert_eq!(store.read_count(), 3);

        store.set_unavailable(true);
        assert!(store.count("c", &[]).await.is_err());
        assert_eq!(store.read_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_collection() {
        let store = MemoryStore::new();
        assert!(!store.delete("nope", "k").await.unwrap());
    }
}
