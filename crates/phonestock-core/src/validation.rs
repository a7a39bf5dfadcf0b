//! # Validation Module
//!
//! Precondition checks for search and listing requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                           │
//! │  ├── Warehouse picker always sends an id                               │
//! │  └── Pager never goes below page 1                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── warehouse_id non-empty                                            │
//! │  ├── page >= 1, page_size >= 1                                         │
//! │  └── search term trimmed, blank → no term                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document store                                               │
//! │  └── No schema at all (see document.rs for defaulting)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use phonestock_core::validation::validate_search_request;
//!
//! let request = validate_search_request("W1", Some("  iphone "), 1, 20).unwrap();
//! assert_eq!(request.term.as_deref(), Some("iphone"));
//!
//! assert!(validate_search_request("", None, 1, 20).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Search Request
// =============================================================================

/// A search request whose preconditions have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed warehouse id.
    pub warehouse_id: String,
    /// Trimmed, non-blank search term.
    pub term: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

/// Validates every input of a search or listing call.
pub fn validate_search_request(
    warehouse_id: &str,
    term: Option<&str>,
    page: u32,
    page_size: u32,
) -> ValidationResult<SearchRequest> {
    let warehouse_id = validate_warehouse_id(warehouse_id)?;
    validate_page(page)?;
    validate_page_size(page_size)?;
    let term = term.and_then(normalize_search_query);

    Ok(SearchRequest {
        warehouse_id,
        term,
        page,
        page_size,
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a warehouse id.
///
/// ## Returns
/// The trimmed id.
pub fn validate_warehouse_id(warehouse_id: &str) -> ValidationResult<String> {
    let warehouse_id = warehouse_id.trim();

    if warehouse_id.is_empty() {
        return Err(ValidationError::Required {
            field: "warehouse_id".to_string(),
        });
    }

    Ok(warehouse_id.to_string())
}

/// Trims a search query; blank means "no search term".
pub fn normalize_search_query(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_string())
}

/// Validates a store collection name from configuration.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain `/` (reserved for document paths)
pub fn validate_collection_name(field: &str, name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.contains('/') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain '/'".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a 1-based page number.
pub fn validate_page(page: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }

    Ok(())
}

/// Validates a page size. Any positive size is accepted.
pub fn validate_page_size(page_size: u32) -> ValidationResult<()> {
    if page_size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page_size".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_warehouse_id() {
        assert_eq!(validate_warehouse_id(" W1 ").unwrap(), "W1");
        assert!(validate_warehouse_id("").is_err());
        assert!(validate_warehouse_id("   ").is_err());
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  iphone 15 "), Some("iphone 15".to_string()));
        assert_eq!(normalize_search_query("   "), None);

        let long = "a".repeat(250);
        assert_eq!(normalize_search_query(&long), Some(long.clone()));
    }

    #[test]
    fn test_validate_page_and_size() {
        assert!(validate_page(0).is_err());
        assert!(validate_page(1).is_ok());

        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(101).is_ok());
        assert!(validate_page_size(u32::MAX).is_ok());
    }

    #[test]
    fn test_validate_collection_name() {
        assert!(validate_collection_name("collections.active", "phoneDetails").is_ok());
        assert!(validate_collection_name("collections.active", "").is_err());
        assert!(validate_collection_name("collections.active", "a/b").is_err());
    }

    #[test]
    fn test_request_without_term() {
        let request = validate_search_request("W1", None, 2, 20).unwrap();
        assert_eq!(request.term, None);
        assert_eq!(request.page, 2);

        let request = validate_search_request("W1", Some(""), 1, 20).unwrap();
        assert_eq!(request.term, None);
    }
}
