//! # phonestock-db: Document Store Layer for Phonestock
//!
//! This crate reads phone units and catalog models out of a schemaless
//! document store and builds the cross-partition search index on top.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Phonestock Data Flow                             │
//! │                                                                         │
//! │  Inventory screen (search box, page controls)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   phonestock-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │   │
//! │  │   │ SearchIndex   │──►│ Repositories  │──►│ DocumentStore │   │   │
//! │  │   │ (search.rs)   │   │ catalog, unit │   │ sqlite/memory │   │   │
//! │  │   └───────────────┘   └───────────────┘   └───────┬───────┘   │   │
//! │  │          │ pure planning and decoding             │           │   │
//! │  │          ▼                                        │           │   │
//! │  │     phonestock-core                               │           │   │
//! │  └───────────────────────────────────────────────────┼───────────┘   │
//! │                                                      ▼               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: documents(collection, doc_key, body JSON, seq)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`search`] - PhoneDetailSearchIndex
//! - [`repository`] - Catalog and per-partition unit reads
//! - [`store`] - DocumentStore trait, SQLite and in-memory backends
//! - [`config`] - Settings file and environment overrides
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use phonestock_db::{Database, PhoneDetailSearchIndex, StoreSettings};
//!
//! let settings = StoreSettings::load(None)?;
//! let db = Database::new(settings.db_config()).await?;
//!
//! let index = PhoneDetailSearchIndex::from_settings(Arc::new(db.documents()), &settings);
//! let page = index.search("W1", Some("iphone 15"), 1, 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod search;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CollectionNames, StoreSettings};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use search::PhoneDetailSearchIndex;
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteDocumentStore;
pub use store::{DocumentStore, FieldFilter};

// Repository re-exports for convenience
pub use repository::{PhoneCatalog, UnitRepository};
