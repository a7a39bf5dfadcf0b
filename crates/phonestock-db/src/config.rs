//! # Store Settings
//!
//! Configuration for the document store and the search index.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PHONESTOCK_DB_PATH=./data/store.db                                 │
//! │     PHONESTOCK_PAGE_SIZE=50                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/phonestock/phonestock.toml (Linux)                       │
//! │     ~/Library/Application Support/com.phonestock.store/... (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ./phonestock.db, legacy collection names, page size 20             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./phonestock.db"
//! max_connections = 5
//!
//! [collections]
//! active = "phoneDetails"
//! sold = "exportedPhoneDetails"
//! removed = "recycledPhoneDetails"
//! catalog = "phones"
//!
//! [search]
//! default_page_size = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use phonestock_core::validation::{validate_collection_name, validate_page_size};
use phonestock_core::{LifecycleState, DEFAULT_PAGE_SIZE};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

// =============================================================================
// Database Settings
// =============================================================================

/// Where the SQLite document store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./phonestock.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Collection Names
// =============================================================================

/// Names of the collections the search index reads.
///
/// Defaults match the collection names of the hosted store the data was
/// first written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionNames {
    #[serde(default = "default_active")]
    pub active: String,

    #[serde(default = "default_sold")]
    pub sold: String,

    #[serde(default = "default_removed")]
    pub removed: String,

    #[serde(default = "default_catalog")]
    pub catalog: String,
}

fn default_active() -> String {
    "phoneDetails".to_string()
}

fn default_sold() -> String {
    "exportedPhoneDetails".to_string()
}

fn default_removed() -> String {
    "recycledPhoneDetails".to_string()
}

fn default_catalog() -> String {
    "phones".to_string()
}

impl Default for CollectionNames {
    fn default() -> Self {
        CollectionNames {
            active: default_active(),
            sold: default_sold(),
            removed: default_removed(),
            catalog: default_catalog(),
        }
    }
}

impl CollectionNames {
    /// Returns the collection holding units of `partition`.
    pub fn partition(&self, partition: LifecycleState) -> &str {
        match partition {
            LifecycleState::Active => &self.active,
            LifecycleState::Sold => &self.sold,
            LifecycleState::Removed => &self.removed,
        }
    }
}

// =============================================================================
// Search Settings
// =============================================================================

/// Search index behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Page size used when the caller passes none.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            default_page_size: default_page_size(),
        }
    }
}

// =============================================================================
// Main Settings
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub collections: CollectionNames,

    #[serde(default)]
    pub search: SearchSettings,
}

impl StoreSettings {
    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (phonestock.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store settings from file");
                let contents = std::fs::read_to_string(&path)?;
                settings = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Settings file not found, using defaults");
            }
        }

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Parses settings from TOML text without env overrides.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the settings.
    pub fn validate(&self) -> DbResult<()> {
        let names = [
            ("collections.active", &self.collections.active),
            ("collections.sold", &self.collections.sold),
            ("collections.removed", &self.collections.removed),
            ("collections.catalog", &self.collections.catalog),
        ];
        for (field, name) in names {
            validate_collection_name(field, name)
                .map_err(|e| DbError::InvalidConfig(e.to_string()))?;
        }

        let mut unit_collections = [
            &self.collections.active,
            &self.collections.sold,
            &self.collections.removed,
        ];
        unit_collections.sort();
        if unit_collections.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(DbError::InvalidConfig(
                "active, sold and removed collections must be distinct".into(),
            ));
        }

        validate_page_size(self.search.default_page_size)
            .map_err(|e| DbError::InvalidConfig(e.to_string()))?;

        if self.database.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Builds the pool configuration for the configured database file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PHONESTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("PHONESTOCK_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid PHONESTOCK_MAX_CONNECTIONS"),
            }
        }

        if let Ok(size) = std::env::var("PHONESTOCK_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(n) => self.search.default_page_size = n,
                Err(_) => warn!(value = %size, "Ignoring invalid PHONESTOCK_PAGE_SIZE"),
            }
        }

        let collections = [
            ("PHONESTOCK_ACTIVE_COLLECTION", &mut self.collections.active),
            ("PHONESTOCK_SOLD_COLLECTION", &mut self.collections.sold),
            ("PHONESTOCK_REMOVED_COLLECTION", &mut self.collections.removed),
            ("PHONESTOCK_CATALOG_COLLECTION", &mut self.collections.catalog),
        ];
        for (var, slot) in collections {
            if let Ok(name) = std::env::var(var) {
                debug!(var, name = %name, "Overriding collection name from environment");
                *slot = name;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "phonestock", "store")
            .map(|dirs| dirs.config_dir().join("phonestock.toml"))
    }
}
