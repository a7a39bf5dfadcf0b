//! # Document Decoding
//!
//! Turns schemaless store documents into typed records.
//!
//! ## Defaulting Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Document → PhoneUnit                                 │
//! │                                                                         │
//! │  StoredDocument { key, fields: {"imei": "35..", "color": null, ...} }  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve id (per partition shape)                                      │
//! │       │                                                                 │
//! │       ├── unrecoverable? → CoreError::MissingPrimaryKey (skip doc)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Read every other field with a default                                 │
//! │       • string missing / wrong type  → ""                              │
//! │       • number missing / wrong type  → 0   ("1200" parses to 1200)     │
//! │       • attribution missing          → empty employee                  │
//! │       • optional reference missing   → None                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PhoneUnit (never a partially-typed value past this point)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Partition Shapes
//! Active and removed documents share one shape. Sold documents were
//! written by the export flow and use different field names for the same
//! data; [`UnitShape`] captures the renames.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::types::{Attribution, LifecycleState, PhoneModel, PhoneUnit};

/// Untyped field map of a stored document.
pub type Fields = Map<String, Value>;

// =============================================================================
// Field Names
// =============================================================================

/// Field names shared by every unit partition.
pub mod field {
    pub const ID: &str = "id";
    pub const PHONE_ID: &str = "phoneId";
    pub const WAREHOUSE_ID: &str = "warehouseId";
    pub const COLOR: &str = "color";
    pub const IMEI: &str = "imei";
    pub const IMPORT_PRICE: &str = "importPrice";
    pub const IMPORT_ID: &str = "importId";
    pub const IMPORTED_AT: &str = "importedAt";
    pub const EMPLOYEE_ID: &str = "employeeId";
    pub const EMPLOYEE_NAME: &str = "employeeName";

    // Catalog
    pub const NAME: &str = "name";
    pub const SKU: &str = "sku";
    pub const SEARCH_KEYWORDS: &str = "searchKeywords";
}

/// Field names that differ between the active and sold document shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitShape {
    /// Field carrying the stable unit id.
    pub id_field: &'static str,
    /// Whether the storage key doubles as the unit id.
    pub id_from_key: bool,
    pub sale_price: &'static str,
    pub condition: &'static str,
    pub attribution: &'static str,
}

impl UnitShape {
    /// Shape used by the active and removed partitions.
    pub const ACTIVE: UnitShape = UnitShape {
        id_field: field::ID,
        id_from_key: true,
        sale_price: "salePrice",
        condition: "condition",
        attribution: "updatedBy",
    };

    /// Shape written by the export flow into the sold partition.
    pub const SOLD: UnitShape = UnitShape {
        id_field: "phoneDetailId",
        id_from_key: false,
        sale_price: "exportPrice",
        condition: "note",
        attribution: "exportedBy",
    };

    /// Returns the document shape of a partition.
    pub const fn of(partition: LifecycleState) -> UnitShape {
        match partition {
            LifecycleState::Sold => UnitShape::SOLD,
            LifecycleState::Active | LifecycleState::Removed => UnitShape::ACTIVE,
        }
    }
}

// =============================================================================
// Stored Document
// =============================================================================

/// A raw document as returned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredDocument {
    /// Storage key within its collection.
    pub key: String,

    /// Untyped field map, no schema enforced.
    pub fields: Fields,
}

impl StoredDocument {
    /// Creates a document from a key and field map.
    pub fn new(key: impl Into<String>, fields: Fields) -> Self {
        StoredDocument {
            key: key.into(),
            fields,
        }
    }

    /// Creates a document from a JSON value; non-object values yield no fields.
    pub fn from_value(key: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        StoredDocument::new(key, fields)
    }

    /// Reads a string field, defaulting to `""`.
    pub fn str_field(&self, name: &str) -> String {
        str_value(self.fields.get(name))
    }

    /// Reads an integer field, defaulting to `0`.
    pub fn int_field(&self, name: &str) -> i64 {
        int_value(self.fields.get(name))
    }

    /// Reads a non-empty string field.
    pub fn opt_str_field(&self, name: &str) -> Option<String> {
        let value = self.str_field(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Reads a timestamp stored as RFC 3339 text, epoch millis, or a
    /// `{seconds, nanoseconds}` object.
    pub fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(name)? {
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            Value::Object(map) => {
                let seconds = int_value(map.get("seconds"));
                let nanos = int_value(map.get("nanoseconds")).clamp(0, 999_999_999) as u32;
                Utc.timestamp_opt(seconds, nanos).single()
            }
            _ => None,
        }
    }

    /// Reads an `{employeeId, employeeName}` object, defaulting to empty.
    pub fn attribution_field(&self, name: &str) -> Attribution {
        match self.fields.get(name) {
            Some(Value::Object(map)) => Attribution {
                employee_id: str_value(map.get(field::EMPLOYEE_ID)),
                employee_name: str_value(map.get(field::EMPLOYEE_NAME)),
            },
            _ => Attribution::default(),
        }
    }

    /// Reads an array of strings; non-string entries are ignored.
    pub fn string_list_field(&self, name: &str) -> Vec<String> {
        match self.fields.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn str_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        // Numeric ids and IMEIs typed in as numbers still read as text
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn int_value(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(|f| f.round() as i64).unwrap_or(0),
        _ => 0,
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes a unit document read from `partition`.
///
/// ## Errors
/// `CoreError::MissingPrimaryKey` when the unit id cannot be recovered;
/// every other field is defaulted.
pub fn decode_unit(
    doc: &StoredDocument,
    partition: LifecycleState,
    collection: &str,
) -> CoreResult<PhoneUnit> {
    let shape = UnitShape::of(partition);

    let id = resolve_unit_id(doc, shape).ok_or_else(|| CoreError::MissingPrimaryKey {
        collection: collection.to_string(),
        key: doc.key.clone(),
    })?;

    Ok(PhoneUnit {
        id,
        phone_model_id: doc.str_field(field::PHONE_ID),
        warehouse_id: doc.str_field(field::WAREHOUSE_ID),
        color: doc.str_field(field::COLOR),
        imei: doc.str_field(field::IMEI).trim().to_string(),
        import_price: doc.int_field(field::IMPORT_PRICE),
        sale_price: doc.int_field(shape.sale_price),
        condition_notes: doc.str_field(shape.condition),
        last_updated_by: doc.attribution_field(shape.attribution),
        import_id: doc.opt_str_field(field::IMPORT_ID),
        imported_at: doc.timestamp_field(field::IMPORTED_AT),
        lifecycle_state: partition,
    })
}

fn resolve_unit_id(doc: &StoredDocument, shape: UnitShape) -> Option<String> {
    if let Some(id) = doc.opt_str_field(shape.id_field) {
        return Some(id);
    }
    // Older sold documents copied the active shape verbatim
    if shape.id_field != field::ID {
        if let Some(id) = doc.opt_str_field(field::ID) {
            return Some(id);
        }
    }
    if shape.id_from_key && !doc.key.trim().is_empty() {
        return Some(doc.key.clone());
    }
    None
}

/// Decodes a catalog document. The storage key is the model id.
pub fn decode_model(doc: &StoredDocument, collection: &str) -> CoreResult<PhoneModel> {
    let id = doc
        .opt_str_field(field::ID)
        .or_else(|| (!doc.key.trim().is_empty()).then(|| doc.key.clone()))
        .ok_or_else(|| CoreError::MissingPrimaryKey {
            collection: collection.to_string(),
            key: doc.key.clone(),
        })?;

    Ok(PhoneModel {
        id,
        name: doc.str_field(field::NAME),
        sku: doc.str_field(field::SKU),
        search_keywords: doc.string_list_field(field::SEARCH_KEYWORDS),
    })
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes a unit into the document shape of `partition`.
///
/// Used by the flows that copy units between partitions and by seeding.
pub fn encode_unit(unit: &PhoneUnit, partition: LifecycleState) -> Fields {
    let shape = UnitShape::of(partition);
    let mut fields = Fields::new();

    fields.insert(shape.id_field.to_string(), Value::from(unit.id.clone()));
    fields.insert(field::PHONE_ID.to_string(), Value::from(unit.phone_model_id.clone()));
    fields.insert(field::WAREHOUSE_ID.to_string(), Value::from(unit.warehouse_id.clone()));
    fields.insert(field::COLOR.to_string(), Value::from(unit.color.clone()));
    fields.insert(field::IMEI.to_string(), Value::from(unit.imei.clone()));
    fields.insert(field::IMPORT_PRICE.to_string(), Value::from(unit.import_price));
    fields.insert(shape.sale_price.to_string(), Value::from(unit.sale_price));
    fields.insert(shape.condition.to_string(), Value::from(unit.condition_notes.clone()));

    let mut attribution = Fields::new();
    attribution.insert(
        field::EMPLOYEE_ID.to_string(),
        Value::from(unit.last_updated_by.employee_id.clone()),
    );
    attribution.insert(
        field::EMPLOYEE_NAME.to_string(),
        Value::from(unit.last_updated_by.employee_name.clone()),
    );
    fields.insert(shape.attribution.to_string(), Value::Object(attribution));

    if let Some(import_id) = &unit.import_id {
        fields.insert(field::IMPORT_ID.to_string(), Value::from(import_id.clone()));
    }
    if let Some(imported_at) = unit.imported_at {
        fields.insert(field::IMPORTED_AT.to_string(), Value::from(imported_at.to_rfc3339()));
    }

    fields
}

/// Encodes a catalog entry.
pub fn encode_model(model: &PhoneModel) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field::ID.to_string(), Value::from(model.id.clone()));
    fields.insert(field::NAME.to_string(), Value::from(model.name.clone()));
    fields.insert(field::SKU.to_string(), Value::from(model.sku.clone()));
    fields.insert(
        field::SEARCH_KEYWORDS.to_string(),
        Value::from(model.search_keywords.clone()),
    );
    fields
}

// =============================================================================
// Unit Tests
// =============================================================================
