//! # Unit Repository
//!
//! Reads of phone units within one lifecycle partition.
//!
//! Every read decodes through [`decode_unit`] with the partition's document
//! shape, so callers only ever see fully-defaulted [`PhoneUnit`] values.
//! Documents whose unit id cannot be recovered are logged and skipped.
//!
//! ## Filters Used
//! ```text
//! find_by_imei        warehouseId == W  AND imei == X
//! count/page_by_model warehouseId == W  AND phoneId == M
//! count/page_by_wh    warehouseId == W
//! find_by_id          storage key (active, removed)
//!                     phoneDetailId == id, then id == id (sold)
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use phonestock_core::document::{decode_unit, field, UnitShape};
use phonestock_core::{LifecycleState, PhoneUnit, StoredDocument};

use crate::error::DbResult;
use crate::store::{DocumentStore, FieldFilter};

/// Repository for unit reads in a single partition.
#[derive(Clone)]
pub struct UnitRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
    partition: LifecycleState,
}

impl UnitRepository {
    /// Creates a new UnitRepository for `partition` stored in `collection`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        partition: LifecycleState,
    ) -> Self {
        UnitRepository {
            store,
            collection: collection.into(),
            partition,
        }
    }

    /// The lifecycle partition this repository reads.
    pub fn partition(&self) -> LifecycleState {
        self.partition
    }

    /// Name of the backing collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    fn decode(&self, doc: &StoredDocument) -> Option<PhoneUnit> {
        match decode_unit(doc, self.partition, &self.collection) {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!(partition = %self.partition, error = %e, "Skipping unit document");
                None
            }
        }
    }

    fn decode_all(&self, docs: Vec<StoredDocument>) -> Vec<PhoneUnit> {
        docs.iter().filter_map(|doc| self.decode(doc)).collect()
    }

    fn warehouse_filter(warehouse_id: &str) -> FieldFilter {
        FieldFilter::eq(field::WAREHOUSE_ID, warehouse_id)
    }

    fn model_filters(warehouse_id: &str, model_id: &str) -> [FieldFilter; 2] {
        [
            Self::warehouse_filter(warehouse_id),
            FieldFilter::eq(field::PHONE_ID, model_id),
        ]
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Finds every unit in a warehouse with exactly this IMEI.
    ///
    /// Duplicate IMEIs are data-entry errors but are all returned.
    ///
    /// Filters match string fields only. A document whose `imei` was stored
    /// as a JSON number is never found here, even though [`decode_unit`]
    /// renders it as text when the unit is listed.
    pub async fn find_by_imei(&self, warehouse_id: &str, imei: &str) -> DbResult<Vec<PhoneUnit>> {
        let filters = [
            Self::warehouse_filter(warehouse_id),
            FieldFilter::eq(field::IMEI, imei),
        ];
        let docs = self.store.query(&self.collection, &filters).await?;

        debug!(
            partition = %self.partition,
            warehouse_id = %warehouse_id,
            imei = %imei,
            found = docs.len(),
            "IMEI lookup"
        );
        Ok(self.decode_all(docs))
    }

    /// Counts units of one model in a warehouse.
    pub async fn count_by_model(&self, warehouse_id: &str, model_id: &str) -> DbResult<u64> {
        self.store
            .count(&self.collection, &Self::model_filters(warehouse_id, model_id))
            .await
    }

    /// Fetches one store page of a model's units in a warehouse.
    ///
    /// ## Arguments
    /// * `store_page` - 1-based page index
    /// * `page_size` - Store page size
    pub async fn page_by_model(
        &self,
        warehouse_id: &str,
        model_id: &str,
        store_page: u64,
        page_size: u32,
    ) -> DbResult<Vec<PhoneUnit>> {
        let offset = store_page.saturating_sub(1) * u64::from(page_size);
        let docs = self
            .store
            .query_page(
                &self.collection,
                &Self::model_filters(warehouse_id, model_id),
                offset,
                page_size,
            )
            .await?;
        Ok(self.decode_all(docs))
    }

    /// Counts units in a warehouse.
    pub async fn count_by_warehouse(&self, warehouse_id: &str) -> DbResult<u64> {
        self.store
            .count(&self.collection, &[Self::warehouse_filter(warehouse_id)])
            .await
    }

    /// Fetches one native page of a warehouse's units.
    pub async fn page_by_warehouse(
        &self,
        warehouse_id: &str,
        page: u32,
        page_size: u32,
    ) -> DbResult<Vec<PhoneUnit>> {
        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        let docs = self
            .store
            .query_page(
                &self.collection,
                &[Self::warehouse_filter(warehouse_id)],
                offset,
                page_size,
            )
            .await?;
        Ok(self.decode_all(docs))
    }

    /// Finds a unit by its stable id.
    ///
    /// Active and removed units are keyed by id. Sold lines are keyed by the
    /// sale line and carry the unit id in a field.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<PhoneUnit>> {
        let shape = UnitShape::of(self.partition);

        if shape.id_from_key {
            if let Some(doc) = self.store.get(&self.collection, id).await? {
                return Ok(self.decode(&doc));
            }
        }

        let mut id_fields = vec![shape.id_field];
        if shape.id_field != field::ID {
            id_fields.push(field::ID);
        }

        for id_field in id_fields {
            let docs = self
                .store
                .query(&self.collection, &[FieldFilter::eq(id_field, id)])
                .await?;
            if let Some(unit) = self.decode_all(docs).into_iter().next() {
                return Ok(Some(unit));
            }
        }

        Ok(None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
