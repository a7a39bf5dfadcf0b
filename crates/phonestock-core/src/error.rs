//! # Error Types
//!
//! Domain-specific error types for phonestock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  phonestock-core errors (this file)                                    │
//! │  ├── CoreError        - Document/domain failures                       │
//! │  └── ValidationError  - Search request precondition failures           │
//! │                                                                         │
//! │  phonestock-db errors (separate crate)                                 │
//! │  └── DbError          - Store, config and query failures               │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → caller (UI messaging)               │
//! │        CoreError::MissingPrimaryKey → logged, document skipped         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored document carries no recoverable primary id.
    ///
    /// ## When This Occurs
    /// - Active/removed document with an empty `id` field and empty storage key
    /// - Sold document missing both `phoneDetailId` and `id`
    ///
    /// The caller skips the single document; the rest of the page survives.
    #[error("Document '{key}' in {collection} has no recoverable id")]
    MissingPrimaryKey { collection: String, key: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
