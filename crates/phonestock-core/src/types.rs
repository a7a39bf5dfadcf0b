//! # Domain Types
//!
//! Core domain types used throughout Phonestock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PhoneModel    │   │    PhoneUnit    │   │   SearchPage    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  phone_model_id │   │  items          │       │
//! │  │  name           │   │  id, imei       │   │  total_count    │       │
//! │  │  search_keywords│   │  warehouse_id   │   └────────┬────────┘       │
//! │  └─────────────────┘   │  lifecycle_state│            │                │
//! │                        └────────┬────────┘            │                │
//! │                                 │ + model_name        │                │
//! │                        ┌────────▼────────┐            │                │
//! │                        │EnrichedPhoneUnit│◄───────────┘                │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! A unit is created `Active` when a purchase is saved, copied to `Sold`
//! when an export completes and copied to `Removed` when recycled. The id
//! never changes across those copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Lifecycle State
// =============================================================================

/// The lifecycle partition a unit currently lives in.
///
/// Each partition is a separate collection in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// In a warehouse, unsold.
    #[default]
    Active,
    /// Exported to a customer.
    Sold,
    /// Written off or recycled.
    Removed,
}

impl LifecycleState {
    /// All partitions, in the order lookups by id visit them.
    pub const ALL: [LifecycleState; 3] = [
        LifecycleState::Active,
        LifecycleState::Sold,
        LifecycleState::Removed,
    ];

    /// Returns the display tag (`active`, `sold`, `removed`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Active => "active",
            LifecycleState::Sold => "sold",
            LifecycleState::Removed => "removed",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "in_stock" => Ok(LifecycleState::Active),
            "sold" | "exported" => Ok(LifecycleState::Sold),
            "removed" | "recycled" => Ok(LifecycleState::Removed),
            _ => Err(ValidationError::NotAllowed {
                field: "lifecycle_state".to_string(),
                allowed: LifecycleState::ALL
                    .iter()
                    .map(|state| state.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Attribution
// =============================================================================

/// The employee who last touched a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub employee_id: String,
    pub employee_name: String,
}

// =============================================================================
// Phone Model
// =============================================================================

/// A phone catalog entry (e.g. "iPhone 15 Pro") that many units instantiate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PhoneModel {
    /// Catalog document id.
    pub id: String,

    /// Display name shown in the inventory table.
    pub name: String,

    /// Stock keeping unit, may be empty.
    pub sku: String,

    /// Extra lower-priority search words ("ip15p", "pro max", ...).
    pub search_keywords: Vec<String>,
}

// =============================================================================
// Phone Unit
// =============================================================================

/// One physical device: the atomic inventory record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PhoneUnit {
    /// Stable unit id, identical in every partition the unit passes through.
    pub id: String,

    /// Catalog entry this unit instantiates.
    pub phone_model_id: String,

    /// Warehouse the unit belongs to (or belonged to before leaving).
    pub warehouse_id: String,

    pub color: String,

    /// May be empty for devices registered before IMEI capture.
    pub imei: String,

    /// Purchase price in the smallest currency unit.
    pub import_price: i64,

    /// Asking price while active, realised price once sold.
    pub sale_price: i64,

    /// Free-form condition notes ("99%", "screen scratch").
    pub condition_notes: String,

    pub last_updated_by: Attribution,

    /// Purchase record that brought the unit into stock.
    pub import_id: Option<String>,

    #[ts(as = "Option<String>")]
    pub imported_at: Option<DateTime<Utc>>,

    /// Partition the unit was read from.
    pub lifecycle_state: LifecycleState,
}

// =============================================================================
// Enriched Phone Unit
// =============================================================================

/// A unit with catalog display data merged in, as handed to the UI.
///
/// `model_name` is empty when the referenced catalog entry no longer
/// resolves; the unit is still listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPhoneUnit {
    #[serde(flatten)]
    pub unit: PhoneUnit,

    pub model_name: String,
}

impl EnrichedPhoneUnit {
    /// Wraps a unit with its resolved model name.
    pub fn new(unit: PhoneUnit, model_name: impl Into<String>) -> Self {
        EnrichedPhoneUnit {
            unit,
            model_name: model_name.into(),
        }
    }

    /// Returns the unit id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.unit.id
    }

    /// Returns the display tag for the unit's partition.
    #[inline]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.unit.lifecycle_state
    }
}

// =============================================================================
// Search Page
// =============================================================================

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<EnrichedPhoneUnit>,

    /// Matching units across all pages for the current filter.
    #[ts(type = "number")]
    pub total_count: u64,
}

impl SearchPage {
    /// Creates a page from items and the filter-wide total.
    pub fn new(items: Vec<EnrichedPhoneUnit>, total_count: u64) -> Self {
        SearchPage { items, total_count }
    }

    /// A page whose items are the whole result (exact IMEI hits).
    pub fn whole(items: Vec<EnrichedPhoneUnit>) -> Self {
        let total_count = items.len() as u64;
        SearchPage { items, total_count }
    }

    /// Returns true if the page carries no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
