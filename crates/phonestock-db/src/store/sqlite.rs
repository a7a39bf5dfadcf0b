//! # SQLite Document Store
//!
//! Stores every collection in the single `documents` table.
//!
//! ## Query Translation
//! ```text
//! query_page("phoneDetails", [warehouseId == "W1", phoneId == "M1"], 20, 20)
//!       │
//!       ▼
//! SELECT doc_key, body FROM documents
//! WHERE collection = ?1
//!   AND json_extract(body, '$."warehouseId"') = ?2
//!   AND json_extract(body, '$."phoneId"') = ?3
//! ORDER BY seq
//! LIMIT ?4 OFFSET ?5
//! ```
//!
//! Field names are written into the SQL as literals (after
//! [`FieldFilter::validate`]) so the expression indexes from
//! `002_unit_indexes.sql` apply. Values are always bound.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use phonestock_core::document::Fields;
use phonestock_core::StoredDocument;

use super::{DocumentStore, FieldFilter};
use crate::error::DbResult;

/// Document store over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Creates a new SqliteDocumentStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDocumentStore { pool }
    }

    fn where_clause(filters: &[FieldFilter]) -> DbResult<String> {
        let mut clause = String::from("WHERE collection = ?");
        for filter in filters {
            filter.validate()?;
            clause.push_str(&format!(
                " AND json_extract(body, '$.\"{}\"') = ?",
                filter.field
            ));
        }
        Ok(clause)
    }

    fn decode_row(collection: &str, key: String, body: &str) -> StoredDocument {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => StoredDocument::from_value(key, value),
            Err(e) => {
                // Unparseable bodies still surface, with every field defaulted
                warn!(collection, key = %key, error = %e, "Document body is not valid JSON");
                StoredDocument::new(key, Fields::new())
            }
        }
    }

    async fn fetch(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        page: Option<(u64, u32)>,
    ) -> DbResult<Vec<StoredDocument>> {
        let mut sql = format!(
            "SELECT doc_key, body FROM documents {} ORDER BY seq",
            Self::where_clause(filters)?
        );
        if page.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut query = sqlx::query_as::<_, (String, String)>(&sql).bind(collection);
        for filter in filters {
            query = query.bind(filter.value.as_str());
        }
        if let Some((offset, limit)) = page {
            query = query.bind(i64::from(limit)).bind(offset as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(key, body)| Self::decode_row(collection, key, &body))
            .collect())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> DbResult<Option<StoredDocument>> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT doc_key, body FROM documents WHERE collection = ?1 AND doc_key = ?2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(key, body)| Self::decode_row(collection, key, &body)))
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> DbResult<Vec<StoredDocument>> {
        debug!(collection, filters = filters.len(), "Querying documents");
        self.fetch(collection, filters, None).await
    }

    async fn query_page(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        offset: u64,
        limit: u32,
    ) -> DbResult<Vec<StoredDocument>> {
        debug!(collection, offset, limit, "Querying document page");
        self.fetch(collection, filters, Some((offset, limit))).await
    }

    async fn count(&self, collection: &str, filters: &[FieldFilter]) -> DbResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM documents {}",
            Self::where_clause(filters)?
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(collection);
        for filter in filters {
            query = query.bind(filter.value.as_str());
        }

        let count = query.fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn put(&self, collection: &str, key: &str, fields: Fields) -> DbResult<()> {
        let body = serde_json::to_string(&Value::Object(fields))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_key, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (collection, doc_key) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND doc_key = ?2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use serde_json::json;

    async fn store() -> (Database, SqliteDocumentStore) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.documents();
        (db, store)
    }

    fn fields(value: Value) -> Fields {
        StoredDocument::from_value("", value).fields
    }

    #[tokio::test]
    async fn test_put_get_and_overwrite_keeps_order() {
        let (_db, store) = store().await;
        store.put("phones", "M1", fields(json!({ "name": "A" }))).await.unwrap();
        store.put("phones", "M2", fields(json!({ "name": "B" }))).await.unwrap();
        store.put("phones", "M1", fields(json!({ "name": "A2" }))).await.unwrap();

        let doc = store.get("phones", "M1").await.unwrap().unwrap();
        assert_eq!(doc.str_field("name"), "A2");

        let keys: Vec<String> = store
            .list("phones")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(keys, vec!["M1", "M2"]);

        assert!(store.get("phones", "M9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters_count_and_pages() {
        let (_db, store) = store().await;
        for i in 0..7 {
            let warehouse = if i % 2 == 0 { "W1" } else { "W2" };
            store
                .put(
                    "phoneDetails",
                    &format!("u{i}"),
                    fields(json!({ "warehouseId": warehouse, "phoneId": "M1" })),
                )
                .await
                .unwrap();
        }

        let w1 = [FieldFilter::eq("warehouseId", "W1")];
        assert_eq!(store.count("phoneDetails", &w1).await.unwrap(), 4);

        let page: Vec<String> = store
            .query_page("phoneDetails", &w1, 2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(page, vec!["u4", "u6"]);

        let both = [
            FieldFilter::eq("warehouseId", "W2"),
            FieldFilter::eq("phoneId", "M1"),
        ];
        assert_eq!(store.query("phoneDetails", &both).await.unwrap().len(), 3);
        assert_eq!(store.count("phones", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_db, store) = store().await;
        store.put("phoneDetails", "u1", Fields::new()).await.unwrap();
        assert!(store.delete("phoneDetails", "u1").await.unwrap());
        assert!(!store.delete("phoneDetails", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_field_name_is_rejected() {
        let (_db, store) = store().await;
        let err = store
            .query("phoneDetails", &[FieldFilter::eq("x') OR 1=1 --", "y")])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(!err.is_store_failure());
    }

    #[tokio::test]
    async fn test_closed_pool_propagates() {
        let (db, store) = store().await;
        db.close().await;
        let err = store.count("phoneDetails", &[]).await.unwrap_err();
        assert!(err.is_store_failure());
    }
}
