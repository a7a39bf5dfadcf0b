//! # phonestock-core: Pure Inventory Logic for Phonestock
//!
//! This crate holds everything about phone inventory listings that can be
//! computed without touching the document store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Phonestock Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Store UI (web client)                        │   │
//! │  │    Inventory table ──► IMEI search box ──► Detail drawer        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              phonestock-db (search index, store)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ pure calls                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ phonestock-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ document  │  │ matching  │  │pagination │  │   │
//! │  │   │ PhoneUnit │  │ defaults  │  │  tokens   │  │  planner  │  │   │
//! │  │   │SearchPage │  │ decoding  │  │  models   │  │  slices   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PhoneUnit, PhoneModel, SearchPage, ...)
//! - [`document`] - Schemaless document decoding with safe defaults
//! - [`matching`] - Search term tokenization and model matching
//! - [`pagination`] - Virtual pagination across per-model result sets
//! - [`validation`] - Search request preconditions
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use phonestock_core::pagination::{plan_page, ModelCount};
//!
//! let counts = vec![ModelCount::new("M1", 3), ModelCount::new("M2", 5)];
//!
//! // Page 2 of size 4 lives entirely inside M2, split over two store pages
//! let plan = plan_page(&counts, 2, 4);
//! assert_eq!(plan.len(), 2);
//! assert!(plan.iter().all(|slice| slice.model_id == "M2"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod matching;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::StoredDocument;
pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
