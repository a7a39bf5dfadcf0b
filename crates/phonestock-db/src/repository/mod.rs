//! # Repository Module
//!
//! Typed reads over the document store.
//!
//! ## Repository Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over one DocumentStore                  │
//! │                                                                         │
//! │  PhoneDetailSearchIndex                                                │
//! │       │                                                                 │
//! │       ├── PhoneCatalog ──────────────► "phones"                        │
//! │       │     get_phone / get_phones / find_matching                     │
//! │       │                                                                 │
//! │       └── UnitRepository × 3                                           │
//! │             ├── Active  ─────────────► "phoneDetails"                  │
//! │             ├── Sold    ─────────────► "exportedPhoneDetails"          │
//! │             └── Removed ─────────────► "recycledPhoneDetails"          │
//! │                   find_by_imei / count_by_model / page_by_model        │
//! │                   count_by_warehouse / page_by_warehouse / find_by_id  │
//! │                                                                         │
//! │  Raw documents are decoded here and nowhere else.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PhoneCatalog`] - Phone model lookups and name matching
//! - [`UnitRepository`] - Unit reads within one lifecycle partition

pub mod catalog;
pub mod unit;

pub use catalog::PhoneCatalog;
pub use unit::UnitRepository;
