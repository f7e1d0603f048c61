//! Data source abstractions for entity records.
//!
//! The dashboard reads and writes through `EntityDataSource`:
//! - `HttpDataSource`: the portal's REST API
//! - `MemoryDataSource`: in-process records, optionally seeded from a JSON
//!   fixture
//!
//! ## Fixture Layout
//!
//! ```text
//! {
//!   "students":    [ { "id": 1, "name": "...", ... } ],
//!   "lecturers":   [ ... ],
//!   "departments": [ { "name": "Physics", "totalYears": 4 } ]
//! }
//! ```

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{DepartmentRecord, EntityRecord, EntityType, FieldMap};

// Re-export for convenience
pub use http::HttpDataSource;
pub use memory::MemoryDataSource;

/// Trait for record backends.
#[async_trait]
pub trait EntityDataSource: Send + Sync {
    /// Fetch every record of an entity type.
    async fn fetch_records(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>>;

    /// Fetch the department list.
    async fn fetch_departments(&self) -> Result<Vec<DepartmentRecord>>;

    /// Create a record and return it as stored.
    async fn create_record(&self, entity_type: EntityType, fields: &FieldMap)
    -> Result<EntityRecord>;

    /// Update a record and return it as stored.
    async fn update_record(
        &self,
        entity_type: EntityType,
        id: i64,
        fields: &FieldMap,
    ) -> Result<EntityRecord>;
}

/// Decode a list payload defensively.
///
/// A payload that is not an array yields an empty list. Entries that fail to
/// decode are skipped.
pub fn decode_list<T: DeserializeOwned>(payload: serde_json::Value, context: &str) -> Vec<T> {
    let serde_json::Value::Array(items) = payload else {
        log::warn!("Expected a list of {context}, got {}; using empty list", kind_of(&payload));
        return Vec::new();
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Skipping malformed {context} entry #{idx}: {e}");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        log::debug!("Decoded {}/{} {context} entries", decoded.len(), total);
    }
    decoded
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
