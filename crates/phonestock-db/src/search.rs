//! # Phone Detail Search Index
//!
//! One page of phone units for a warehouse, merged from the active, sold and
//! removed partitions.
//!
//! ## Search Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    search(warehouse, term, page, size)                  │
//! │                                                                         │
//! │  validate ──► term blank? ──yes──► browse(Active)                      │
//! │                   │                  count + native page of warehouse   │
//! │                   no                                                    │
//! │                   ▼                                                     │
//! │  1. imei == term in ACTIVE ──found──► whole result, total = len        │
//! │                   │                                                     │
//! │  2. imei == term in SOLD ────found──► whole result, tagged sold        │
//! │                   │                                                     │
//! │  3. catalog models matching every token (catalog order)                │
//! │          │                                                              │
//! │          ├── count active units per model ─── concurrently             │
//! │          ├── plan_page(counts, page, size) ── pure, phonestock-core    │
//! │          ├── fetch planned store pages ────── concurrently             │
//! │          └── slice, concatenate in plan order, truncate                │
//! │                                                                         │
//! │  enrich: model names (known from matching, else catalog lookups)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! - Missing catalog entry: `model_name = ""`, the unit is still returned.
//! - Store failure: returned as `Err(DbError)`; never an empty page.
//!
//! The index never writes and keeps no state between calls, so two
//! identical calls with no write in between return identical pages.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::{try_join, try_join_all};
use tracing::{debug, info};

use phonestock_core::pagination::{plan_page, total_count, ModelCount};
use phonestock_core::validation::{validate_search_request, SearchRequest};
use phonestock_core::{
    EnrichedPhoneUnit, LifecycleState, PhoneModel, PhoneUnit, SearchPage, ValidationError,
    DEFAULT_PAGE_SIZE,
};

use crate::config::{CollectionNames, StoreSettings};
use crate::error::{DbError, DbResult};
use crate::repository::{PhoneCatalog, UnitRepository};
use crate::store::DocumentStore;

/// Cross-partition phone unit search.
///
/// ## Usage
/// ```rust,ignore
/// let index = PhoneDetailSearchIndex::new(store, &CollectionNames::default());
///
/// // IMEI, model name, or nothing
/// let page = index.search("W1", Some("iphone 15"), 1, 20).await?;
/// println!("{} of {}", page.items.len(), page.total_count);
///
/// // A unit by id, wherever it lives now
/// let unit = index.get_unit("u-42").await?;
/// ```
#[derive(Clone)]
pub struct PhoneDetailSearchIndex {
    catalog: PhoneCatalog,
    active: UnitRepository,
    sold: UnitRepository,
    removed: UnitRepository,
    default_page_size: u32,
}

impl PhoneDetailSearchIndex {
    /// Creates an index over `store` using the given collection names.
    pub fn new(store: Arc<dyn DocumentStore>, collections: &CollectionNames) -> Self {
        let units = |partition| {
            UnitRepository::new(
                store.clone(),
                collections.partition(partition),
                partition,
            )
        };

        PhoneDetailSearchIndex {
            catalog: PhoneCatalog::new(store.clone(), collections.catalog.clone()),
            active: units(LifecycleState::Active),
            sold: units(LifecycleState::Sold),
            removed: units(LifecycleState::Removed),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates an index configured from loaded settings.
    pub fn from_settings(store: Arc<dyn DocumentStore>, settings: &StoreSettings) -> Self {
        Self::new(store, &settings.collections)
            .with_default_page_size(settings.search.default_page_size)
    }

    /// Sets the page size used by [`first_page`](Self::first_page).
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// The catalog the index enriches from.
    pub fn catalog(&self) -> &PhoneCatalog {
        &self.catalog
    }

    /// The repository reading `partition`.
    pub fn units(&self, partition: LifecycleState) -> &UnitRepository {
        match partition {
            LifecycleState::Active => &self.active,
            LifecycleState::Sold => &self.sold,
            LifecycleState::Removed => &self.removed,
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Searches a warehouse's units.
    ///
    /// ## Arguments
    /// * `warehouse_id` - Warehouse to scope to (required)
    /// * `term` - IMEI or model name text; `None` or blank lists the warehouse
    /// * `page` - 1-based page number
    /// * `page_size` - Items per page (at least 1)
    ///
    /// ## Returns
    /// The requested page and the total match count. IMEI hits are returned
    /// whole, ignoring `page` and `page_size`.
    ///
    /// ## Errors
    /// * `DbError::Validation` - Preconditions violated
    /// * Any store failure, unchanged
    pub async fn search(
        &self,
        warehouse_id: &str,
        term: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> DbResult<SearchPage> {
        let request = validate_search_request(warehouse_id, term, page, page_size)?;

        let Some(term) = request.term.as_deref() else {
            return self.browse_request(LifecycleState::Active, &request).await;
        };

        debug!(
            warehouse_id = %request.warehouse_id,
            term = %term,
            page = request.page,
            page_size = request.page_size,
            "Searching phone units"
        );

        if let Some(found) = self.search_imei(&request.warehouse_id, term).await? {
            return Ok(found);
        }

        self.search_models(&request, term).await
    }

    /// First page of [`search`](Self::search) at the default page size.
    pub async fn first_page(&self, warehouse_id: &str, term: Option<&str>) -> DbResult<SearchPage> {
        self.search(warehouse_id, term, 1, self.default_page_size)
            .await
    }

    /// Exact IMEI lookup in the active partition, then the sold one.
    async fn search_imei(&self, warehouse_id: &str, imei: &str) -> DbResult<Option<SearchPage>> {
        for partition in [LifecycleState::Active, LifecycleState::Sold] {
            let units = self.units(partition).find_by_imei(warehouse_id, imei).await?;
            if units.is_empty() {
                continue;
            }

            info!(
                warehouse_id = %warehouse_id,
                partition = %partition,
                found = units.len(),
                "Exact IMEI match"
            );
            let items = self.enrich(units, HashMap::new()).await?;
            return Ok(Some(SearchPage::whole(items)));
        }
        Ok(None)
    }

    /// Model name search with pagination across the matched models.
    async fn search_models(&self, request: &SearchRequest, term: &str) -> DbResult<SearchPage> {
        let warehouse_id = request.warehouse_id.as_str();
        let models = self.catalog.find_matching(term).await?;
        if models.is_empty() {
            return Ok(SearchPage::default());
        }

        let counts = try_join_all(models.iter().map(|model| async move {
            let count = self.active.count_by_model(warehouse_id, &model.id).await?;
            Ok::<_, DbError>(ModelCount::new(model.id.clone(), count))
        }))
        .await?;
        let total = total_count(&counts);

        let plan = plan_page(&counts, request.page, request.page_size);
        debug!(
            models = models.len(),
            total,
            fetches = plan.len(),
            "Planned model page"
        );

        let fetched = try_join_all(plan.iter().map(|slice| {
            self.active.page_by_model(
                warehouse_id,
                &slice.model_id,
                slice.store_page,
                slice.page_size,
            )
        }))
        .await?;

        let mut units: Vec<PhoneUnit> = plan
            .iter()
            .zip(fetched)
            .flat_map(|(slice, page)| slice.apply(page))
            .collect();
        units.truncate(request.page_size as usize);

        let names = model_names(models);
        let items = self.enrich(units, names).await?;
        Ok(SearchPage::new(items, total))
    }

    // =========================================================================
    // Browse and Lookup
    // =========================================================================

    /// Lists a partition's units in a warehouse with native pagination.
    ///
    /// `browse(Active, ..)` is what [`search`](Self::search) does for a
    /// blank term; the sold and removed partitions back the sales history
    /// and recycle bin screens.
    pub async fn browse(
        &self,
        partition: LifecycleState,
        warehouse_id: &str,
        page: u32,
        page_size: u32,
    ) -> DbResult<SearchPage> {
        let request = validate_search_request(warehouse_id, None, page, page_size)?;
        self.browse_request(partition, &request).await
    }

    async fn browse_request(
        &self,
        partition: LifecycleState,
        request: &SearchRequest,
    ) -> DbResult<SearchPage> {
        let repo = self.units(partition);
        let warehouse_id = request.warehouse_id.as_str();

        let (total, units) = try_join(
            repo.count_by_warehouse(warehouse_id),
            repo.page_by_warehouse(warehouse_id, request.page, request.page_size),
        )
        .await?;

        debug!(
            partition = %partition,
            warehouse_id = %warehouse_id,
            page = request.page,
            returned = units.len(),
            total,
            "Browsed partition"
        );

        let items = self.enrich(units, HashMap::new()).await?;
        Ok(SearchPage::new(items, total))
    }

    /// Finds a unit by id, checking active, then sold, then removed.
    ///
    /// ## Returns
    /// * `Ok(Some(unit))` - Found, tagged with its current partition
    /// * `Ok(None)` - Not in any partition
    pub async fn get_unit(&self, id: &str) -> DbResult<Option<EnrichedPhoneUnit>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }

        for partition in LifecycleState::ALL {
            if let Some(unit) = self.units(partition).find_by_id(id).await? {
                debug!(id = %id, partition = %partition, "Resolved unit");
                let mut items = self.enrich(vec![unit], HashMap::new()).await?;
                return Ok(items.pop());
            }
        }

        Ok(None)
    }

    /// Like [`get_unit`](Self::get_unit) but a missing unit is an error.
    pub async fn require_unit(&self, id: &str) -> DbResult<EnrichedPhoneUnit> {
        self.get_unit(id)
            .await?
            .ok_or_else(|| DbError::not_found("PhoneUnit", id.trim()))
    }

    // =========================================================================
    // Enrichment
    // =========================================================================

    /// Attaches model names, looking up the ones not already `known`.
    async fn enrich(
        &self,
        units: Vec<PhoneUnit>,
        mut known: HashMap<String, String>,
    ) -> DbResult<Vec<EnrichedPhoneUnit>> {
        let mut seen = HashSet::new();
        let missing: Vec<&str> = units
            .iter()
            .map(|unit| unit.phone_model_id.as_str())
            .filter(|id| !id.is_empty() && !known.contains_key(*id) && seen.insert(*id))
            .collect();

        if !missing.is_empty() {
            let found = try_join_all(missing.iter().map(|id| self.catalog.get_phone(id))).await?;
            for (id, model) in missing.iter().zip(found) {
                if let Some(model) = model {
                    known.insert(id.to_string(), model.name);
                }
            }
        }

        Ok(units
            .into_iter()
            .map(|unit| {
                let name = match known.get(&unit.phone_model_id) {
                    Some(name) => name.clone(),
                    None => {
                        debug!(
                            unit_id = %unit.id,
                            model_id = %unit.phone_model_id,
                            "Model not in catalog"
                        );
                        String::new()
                    }
                };
                EnrichedPhoneUnit::new(unit, name)
            })
            .collect())
    }
}

fn model_names(models: Vec<PhoneModel>) -> HashMap<String, String> {
    models
        .into_iter()
        .map(|model| (model.id, model.name))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::memory::{MemoryStore, ReadKind};
    use phonestock_core::document::{encode_model, encode_unit, field, Fields};
    use phonestock_core::StoredDocument;
    use serde_json::json;

    const ACTIVE: &str = "phoneDetails";
    const SOLD: &str = "exportedPhoneDetails";
    const REMOVED: &str = "recycledPhoneDetails";
    const PHONES: &str = "phones";

    struct Fixture {
        store: Arc<MemoryStore>,
        index: PhoneDetailSearchIndex,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let index = PhoneDetailSearchIndex::new(store.clone(), &CollectionNames::default());
            Fixture { store, index }
        }

        async fn model(&self, id: &str, name: &str) {
            let model = PhoneModel {
                id: id.to_string(),
                name: name.to_string(),
                sku: String::new(),
                search_keywords: Vec::new(),
            };
            self.store
                .put(PHONES, id, encode_model(&model))
                .await
                .unwrap();
        }

        async fn unit(&self, partition: LifecycleState, id: &str, model: &str, imei: &str) {
            self.unit_in(partition, "W1", id, model, imei).await;
        }

        async fn unit_in(
            &self,
            partition: LifecycleState,
            warehouse: &str,
            id: &str,
            model: &str,
            imei: &str,
        ) {
            let unit = PhoneUnit {
                id: id.to_string(),
                phone_model_id: model.to_string(),
                warehouse_id: warehouse.to_string(),
                imei: imei.to_string(),
                ..PhoneUnit::default()
            };
            let (collection, key) = match partition {
                LifecycleState::Active => (ACTIVE, id.to_string()),
                LifecycleState::Sold => (SOLD, format!("sale-{id}")),
                LifecycleState::Removed => (REMOVED, id.to_string()),
            };
            self.store
                .put(collection, &key, encode_unit(&unit, partition))
                .await
                .unwrap();
        }

        async fn raw(&self, collection: &str, key: &str, value: serde_json::Value) {
            let fields: Fields = StoredDocument::from_value(key, value).fields;
            self.store.put(collection, key, fields).await.unwrap();
        }

        /// W1 has M1 × 3 and M2 × 5 active units, both matching "m".
        async fn worked_example() -> Self {
            let f = Fixture::new();
            f.model("M1", "Model One").await;
            f.model("M2", "Model Two").await;
            for i in 0..3 {
                f.unit(LifecycleState::Active, &format!("a{i}"), "M1", &format!("1{i}"))
                    .await;
            }
            for i in 0..5 {
                f.unit(LifecycleState::Active, &format!("b{i}"), "M2", &format!("2{i}"))
                    .await;
            }
            f
        }
    }

    fn ids(page: &SearchPage) -> Vec<&str> {
        page.items.iter().map(|item| item.id()).collect()
    }

    #[tokio::test]
    async fn test_worked_example_pages() {
        let f = Fixture::worked_example().await;

        let page1 = f.index.search("W1", Some("m"), 1, 4).await.unwrap();
        assert_eq!(page1.total_count, 8);
        assert_eq!(ids(&page1), vec!["a0", "a1", "a2", "b0"]);
        assert_eq!(page1.items[0].model_name, "Model One");
        assert_eq!(page1.items[3].model_name, "Model Two");

        let page2 = f.index.search("W1", Some("m"), 2, 4).await.unwrap();
        assert_eq!(page2.total_count, 8);
        assert_eq!(ids(&page2), vec!["b1", "b2", "b3", "b4"]);

        let page3 = f.index.search("W1", Some("m"), 3, 4).await.unwrap();
        assert!(page3.is_empty());
        assert_eq!(page3.total_count, 8);
    }

    #[tokio::test]
    async fn test_pages_cover_every_unit_once() {
        let f = Fixture::new();
        let sizes = [("M1", 4), ("M2", 0), ("M3", 7), ("M4", 1), ("M5", 5)];
        for (model, count) in sizes {
            f.model(model, &format!("Galaxy {model}")).await;
            for i in 0..count {
                f.unit(LifecycleState::Active, &format!("{model}-{i}"), model, "")
                    .await;
            }
        }
        // Units of another warehouse never leak into W1's pages
        f.unit_in(LifecycleState::Active, "W2", "far", "M1", "").await;

        let expected: Vec<String> = sizes
            .iter()
            .flat_map(|(model, count)| (0..*count).map(move |i| format!("{model}-{i}")))
            .collect();

        for page_size in 1..=8 {
            let mut seen = Vec::new();
            let mut page = 1;
            loop {
                let result = f
                    .index
                    .search("W1", Some("galaxy"), page, page_size)
                    .await
                    .unwrap();
                assert_eq!(result.total_count, expected.len() as u64);
                if result.is_empty() {
                    break;
                }
                assert!(result.items.len() <= page_size as usize);
                seen.extend(result.items.iter().map(|item| item.id().to_string()));
                page += 1;
            }
            assert_eq!(seen, expected, "page_size {page_size}");
        }
    }

    #[tokio::test]
    async fn test_exact_imei_short_circuits() {
        let f = Fixture::worked_example().await;
        // A model whose name contains the IMEI would match the name search
        f.model("M3", "Edition 21").await;
        f.unit(LifecycleState::Active, "c0", "M3", "99").await;

        for (page, page_size) in [(1, 20), (5, 1)] {
            let result = f.index.search("W1", Some(" 21 "), page, page_size).await.unwrap();
            assert_eq!(ids(&result), vec!["b1"]);
            assert_eq!(result.total_count, 1);
            assert_eq!(result.items[0].lifecycle_state(), LifecycleState::Active);
            assert_eq!(result.items[0].model_name, "Model Two");
        }
    }

    #[tokio::test]
    async fn test_duplicate_imeis_all_returned() {
        let f = Fixture::worked_example().await;
        f.unit(LifecycleState::Active, "dup", "M1", "10").await;

        let result = f.index.search("W1", Some("10"), 1, 1).await.unwrap();
        assert_eq!(ids(&result), vec!["a0", "dup"]);
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn test_sold_fallback() {
        let f = Fixture::worked_example().await;
        f.raw(
            SOLD,
            "sale-1",
            json!({
                "phoneDetailId": "s1",
                "phoneId": "M1",
                "warehouseId": "W1",
                "imei": "777",
                "exportPrice": 2500,
                "note": "gift box",
                "exportedBy": { "employeeId": "e2", "employeeName": "Minh" },
            }),
        )
        .await;

        let result = f.index.search("W1", Some("777"), 1, 20).await.unwrap();
        assert_eq!(result.total_count, 1);
        let item = &result.items[0];
        assert_eq!(item.id(), "s1");
        assert_eq!(item.lifecycle_state(), LifecycleState::Sold);
        assert_eq!(item.unit.sale_price, 2500);
        assert_eq!(item.unit.condition_notes, "gift box");
        assert_eq!(item.unit.last_updated_by.employee_name, "Minh");
        assert_eq!(item.model_name, "Model One");

        // Sold units in another warehouse stay hidden
        let other = f.index.search("W2", Some("777"), 1, 20).await.unwrap();
        assert!(other.is_empty());
        assert_eq!(other.total_count, 0);
    }

    #[tokio::test]
    async fn test_active_match_wins_over_sold() {
        let f = Fixture::worked_example().await;
        f.unit(LifecycleState::Sold, "old", "M1", "10").await;

        let result = f.index.search("W1", Some("10"), 1, 20).await.unwrap();
        assert_eq!(ids(&result), vec!["a0"]);
    }

    #[tokio::test]
    async fn test_tokenized_model_search() {
        let f = Fixture::new();
        f.model("P", "iPhone 15 Pro").await;
        f.unit(LifecycleState::Active, "p0", "P", "").await;

        for term in ["iphone 15", "15 pro", "PRO IPHONE"] {
            let result = f.index.search("W1", Some(term), 1, 20).await.unwrap();
            assert_eq!(ids(&result), vec!["p0"], "{term}");
        }

        let miss = f.index.search("W1", Some("iphone16"), 1, 20).await.unwrap();
        assert!(miss.is_empty());
        assert_eq!(miss.total_count, 0);
    }

    #[tokio::test]
    async fn test_repeated_search_is_identical() {
        let f = Fixture::worked_example().await;
        let first = f.index.search("W1", Some("model"), 2, 3).await.unwrap();
        let second = f.index.search("W1", Some("model"), 2, 3).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_term_page_boundary() {
        let f = Fixture::new();
        f.model("M1", "Model One").await;
        for i in 0..20 {
            f.unit(LifecycleState::Active, &format!("u{i:02}"), "M1", "")
                .await;
        }

        let page1 = f.index.search("W1", None, 1, 20).await.unwrap();
        assert_eq!(page1.items.len(), 20);
        assert_eq!(page1.total_count, 20);

        let page2 = f.index.search("W1", Some("   "), 2, 20).await.unwrap();
        assert!(page2.is_empty());
        assert_eq!(page2.total_count, 20);
    }

    #[tokio::test]
    async fn test_missing_fields_are_defaulted() {
        let f = Fixture::new();
        f.raw(ACTIVE, "bare", json!({ "warehouseId": "W1", "phoneId": "gone" }))
            .await;

        let result = f.index.search("W1", None, 1, 20).await.unwrap();
        assert_eq!(result.items.len(), 1);
        let item = &result.items[0];
        assert_eq!(item.id(), "bare");
        assert_eq!(item.unit.color, "");
        assert_eq!(item.unit.import_price, 0);
        // Unknown model: unit kept, name empty
        assert_eq!(item.model_name, "");
    }

    #[tokio::test]
    async fn test_browse_other_partitions() {
        let f = Fixture::worked_example().await;
        f.unit(LifecycleState::Removed, "r0", "M2", "").await;
        f.unit(LifecycleState::Removed, "r1", "M2", "").await;
        f.unit(LifecycleState::Sold, "s0", "M1", "").await;

        let removed = f
            .index
            .browse(LifecycleState::Removed, "W1", 1, 1)
            .await
            .unwrap();
        assert_eq!(removed.total_count, 2);
        assert_eq!(ids(&removed), vec!["r0"]);
        assert_eq!(removed.items[0].lifecycle_state(), LifecycleState::Removed);

        let sold = f.index.browse(LifecycleState::Sold, "W1", 1, 10).await.unwrap();
        assert_eq!(ids(&sold), vec!["s0"]);
        assert_eq!(sold.items[0].model_name, "Model One");
    }

    #[tokio::test]
    async fn test_get_unit_across_partitions() {
        let f = Fixture::worked_example().await;
        f.unit(LifecycleState::Sold, "s9", "M2", "").await;
        f.unit(LifecycleState::Removed, "r9", "M1", "").await;

        let active = f.index.get_unit("a1").await.unwrap().unwrap();
        assert_eq!(active.lifecycle_state(), LifecycleState::Active);

        let sold = f.index.get_unit("s9").await.unwrap().unwrap();
        assert_eq!(sold.lifecycle_state(), LifecycleState::Sold);
        assert_eq!(sold.model_name, "Model Two");

        let removed = f.index.get_unit("r9").await.unwrap().unwrap();
        assert_eq!(removed.lifecycle_state(), LifecycleState::Removed);

        assert!(f.index.get_unit("nope").await.unwrap().is_none());
        assert!(matches!(
            f.index.require_unit("nope").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_an_empty_page() {
        let f = Fixture::worked_example().await;
        f.store.set_unavailable(true);

        for term in [None, Some("m"), Some("10")] {
            let err = f.index.search("W1", term, 1, 4).await.unwrap_err();
            assert!(err.is_store_failure(), "{term:?}");
        }
        assert!(f.index.get_unit("a0").await.is_err());

        f.store.set_unavailable(false);
        assert_eq!(
            f.index.search("W1", None, 1, 4).await.unwrap().total_count,
            8
        );
    }

    #[tokio::test]
    async fn test_preconditions() {
        let f = Fixture::worked_example().await;
        let cases = [(" ", 1, 20), ("W1", 0, 20), ("W1", 1, 0)];
        for (warehouse, page, page_size) in cases {
            let err = f
                .index
                .search(warehouse, None, page, page_size)
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::Validation(_)));
        }
        assert!(f.index.get_unit("  ").await.is_err());
    }

    #[tokio::test]
    async fn test_large_page_sizes_and_long_terms_are_accepted() {
        let f = Fixture::worked_example().await;

        let all = f.index.search("W1", None, 1, 101).await.unwrap();
        assert_eq!(all.items.len(), 8);
        assert_eq!(all.total_count, 8);

        let models = f.index.search("W1", Some("m"), 1, u32::MAX).await.unwrap();
        assert_eq!(ids(&models), vec!["a0", "a1", "a2", "b0", "b1", "b2", "b3", "b4"]);

        let long = "x".repeat(101);
        let page = f.index.search("W1", Some(&long), 1, 20).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_imei_hit_reads_one_partition_and_no_catalog_list() {
        let f = Fixture::worked_example().await;
        f.unit(LifecycleState::Sold, "s0", "M1", "99").await;

        let before = f.store.read_count();
        let page = f.index.search("W1", Some("11"), 1, 20).await.unwrap();
        assert_eq!(ids(&page), vec!["a1"]);

        let reads = f.store.reads_since(before);
        let unit_reads: Vec<_> = reads.iter().filter(|r| r.collection != PHONES).collect();
        assert_eq!(unit_reads.len(), 1);
        assert_eq!(unit_reads[0].kind, ReadKind::Query);
        assert_eq!(unit_reads[0].collection, ACTIVE);
        assert!(unit_reads[0].has_filter(field::IMEI, "11"));

        // Only the model name lookup touches the catalog
        let catalog_reads: Vec<_> = reads.iter().filter(|r| r.collection == PHONES).collect();
        assert_eq!(catalog_reads.len(), 1);
        assert_eq!(catalog_reads[0].kind, ReadKind::Get);
        assert_eq!(f.store.read_count(), before + 2);
    }

    #[tokio::test]
    async fn test_model_page_skips_fetching_models_before_window() {
        let f = Fixture::new();
        f.model("big", "Phone Big").await;
        f.model("small", "Phone Small").await;
        f.model("tail", "Phone Tail").await;
        for (model, count) in [("big", 50), ("small", 2), ("tail", 10)] {
            for i in 0..count {
                f.unit(
                    LifecycleState::Active,
                    &format!("{model}-{i}"),
                    model,
                    &format!("{model}{i}"),
                )
                .await;
            }
        }

        let before = f.store.read_count();
        let page = f.index.search("W1", Some("phone"), 2, 50).await.unwrap();
        assert_eq!(page.total_count, 62);
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.items[0].id(), "small-0");
        assert_eq!(page.items[2].id(), "tail-0");

        let reads = f.store.reads_since(before);
        let fetched: Vec<_> = reads
            .iter()
            .filter(|r| r.kind == ReadKind::QueryPage)
            .collect();
        assert_eq!(fetched.len(), 2);
        assert!(fetched.iter().all(|r| !r.has_filter(field::PHONE_ID, "big")));
        assert!(fetched.iter().any(|r| r.has_filter(field::PHONE_ID, "small")));
        assert!(fetched.iter().any(|r| r.has_filter(field::PHONE_ID, "tail")));

        // One catalog list and one count per matched model
        assert_eq!(
            reads.iter().filter(|r| r.kind == ReadKind::Count).count(),
            3
        );
        assert_eq!(reads.len(), 6);
    }

    #[tokio::test]
    async fn test_worked_example_on_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.documents();

        for (id, name) in [("M1", "Model One"), ("M2", "Model Two")] {
            let model = PhoneModel {
                id: id.to_string(),
                name: name.to_string(),
                sku: String::new(),
                search_keywords: Vec::new(),
            };
            store.put(PHONES, id, encode_model(&model)).await.unwrap();
        }
        for (prefix, model, count) in [("a", "M1", 3), ("b", "M2", 5)] {
            for i in 0..count {
                let unit = PhoneUnit {
                    id: format!("{prefix}{i}"),
                    phone_model_id: model.to_string(),
                    warehouse_id: "W1".to_string(),
                    imei: format!("{prefix}-imei-{i}"),
                    ..PhoneUnit::default()
                };
                store
                    .put(ACTIVE, &unit.id, encode_unit(&unit, LifecycleState::Active))
                    .await
                    .unwrap();
            }
        }

        let index = PhoneDetailSearchIndex::new(Arc::new(store), &CollectionNames::default());

        let page1 = index.search("W1", Some("m"), 1, 4).await.unwrap();
        assert_eq!(page1.total_count, 8);
        assert_eq!(ids(&page1), vec!["a0", "a1", "a2", "b0"]);
        assert_eq!(page1.items[0].model_name, "Model One");
        assert_eq!(page1.items[3].model_name, "Model Two");

        let page2 = index.search("W1", Some("m"), 2, 4).await.unwrap();
        assert_eq!(page2.total_count, 8);
        assert_eq!(ids(&page2), vec!["b1", "b2", "b3", "b4"]);

        let page3 = index.search("W1", Some("m"), 3, 4).await.unwrap();
        assert_eq!(page3.total_count, 8);
        assert!(page3.items.is_empty());

        let hit = index.search("W1", Some("b-imei-2"), 1, 4).await.unwrap();
        assert_eq!(ids(&hit), vec!["b2"]);

        db.close().await;
    }

    #[tokio::test]
    async fn test_first_page_uses_default_size() {
        let f = Fixture::worked_example().await;
        let index = f.index.clone().with_default_page_size(5);
        let page = index.first_page("W1", None).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_count, 8);
    }
}
