//! # Phone Catalog
//!
//! Read access to phone models, used to resolve model names and to match
//! search terms against model names and keywords.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, warn};

use phonestock_core::document::decode_model;
use phonestock_core::matching::{matching_models, SearchTerms};
use phonestock_core::PhoneModel;

use crate::error::DbResult;
use crate::store::DocumentStore;

/// Repository for phone catalog reads.
///
/// ## Usage
/// ```rust,ignore
/// let catalog = PhoneCatalog::new(store, "phones");
///
/// let model = catalog.get_phone("M1").await?;
/// let matches = catalog.find_matching("iphone pro").await?;
/// ```
#[derive(Clone)]
pub struct PhoneCatalog {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl PhoneCatalog {
    /// Creates a new PhoneCatalog.
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        PhoneCatalog {
            store,
            collection: collection.into(),
        }
    }

    /// Name of the backing collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Gets a phone model by id.
    ///
    /// ## Returns
    /// * `Ok(Some(model))` - Model found
    /// * `Ok(None)` - No such model (or its document has no usable id)
    /// * `Err(_)` - Store failure
    pub async fn get_phone(&self, id: &str) -> DbResult<Option<PhoneModel>> {
        let Some(doc) = self.store.get(&self.collection, id).await? else {
            return Ok(None);
        };

        match decode_model(&doc, &self.collection) {
            Ok(model) => Ok(Some(model)),
            Err(e) => {
                warn!(error = %e, "Skipping catalog document");
                Ok(None)
            }
        }
    }

    /// Gets several phone models concurrently.
    ///
    /// Results follow the order of `ids`; missing ids are omitted.
    pub async fn get_phones(&self, ids: &[String]) -> DbResult<Vec<PhoneModel>> {
        let lookups = ids.iter().map(|id| self.get_phone(id));
        let found = try_join_all(lookups).await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Lists every model in native catalog order.
    pub async fn list(&self) -> DbResult<Vec<PhoneModel>> {
        let docs = self.store.list(&self.collection).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match decode_model(doc, &self.collection) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!(error = %e, "Skipping catalog document");
                    None
                }
            })
            .collect())
    }

    /// Finds models whose name or keywords contain every token of `term`.
    ///
    /// ## Arguments
    /// * `term` - Raw search text; case and token order are ignored
    ///
    /// ## Returns
    /// Matching models in catalog order. A blank term matches nothing.
    pub async fn find_matching(&self, term: &str) -> DbResult<Vec<PhoneModel>> {
        let terms = SearchTerms::parse(term);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let catalog = self.list().await?;
        let matches = matching_models(&terms, &catalog);

        debug!(
            term = %term,
            catalog_size = catalog.len(),
            matched = matches.len(),
            "Matched catalog models"
        );
        Ok(matches)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
