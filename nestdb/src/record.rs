use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::value::Value;

/// A record's field-value map, keyed by column name. Insertion order is
/// preserved for snapshot export.
pub type FieldMap = IndexMap<String, Value>;

/// Field name under which a record's creation time is mirrored when the
/// owning table tracks timestamps.
pub const CREATED_AT_FIELD: &str = "created_at";
/// Field name under which a record's update time is mirrored.
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// A single row: immutable identity, mutable field map, and timestamps.
///
/// Records are created exclusively through [`crate::Table::insert_one`].
/// When the owning table tracks timestamps, `created_at`/`updated_at` are
/// additionally mirrored as ordinary fields inside the value map, so they
/// stay visible to consumers that only read the raw field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    row_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    fields: FieldMap,
    timestamp_data: bool,
}

impl Record {
    pub(crate) fn new(row_id: String, fields: FieldMap, timestamp_data: bool) -> Self {
        let now = Utc::now();
        let mut record = Self {
            row_id,
            created_at: now,
            updated_at: now,
            fields,
            timestamp_data,
        };
        if timestamp_data {
            record.mirror_timestamps();
        }
        record
    }

    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Shared, read-only view of the field map.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    /// Replace the whole field map. Distinct from the table's merge-based
    /// `update_one`: keys absent from `fields` are gone afterwards. Resets
    /// the update timestamp and re-stamps the mirrored fields.
    pub fn set_fields(&mut self, fields: FieldMap) {
        self.fields = fields;
        self.updated_at = Utc::now();
        if self.timestamp_data {
            self.mirror_timestamps();
        }
    }

    /// Bump `updated_at` (and its mirrored field) without changing data.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        if self.timestamp_data {
            self.fields.insert(
                UPDATED_AT_FIELD.to_string(),
                Value::Timestamp(self.updated_at),
            );
        }
    }

    /// Flatten the field map into a plain JSON object for external
    /// consumption. The row id is included under `row_id`.
    pub fn to_plain_object(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert(
            "row_id".to_string(),
            serde_json::Value::String(self.row_id.clone()),
        );
        for (name, value) in &self.fields {
            obj.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(obj)
    }

    fn mirror_timestamps(&mut self) {
        self.fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::Timestamp(self.created_at),
        );
        self.fields.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::Timestamp(self.updated_at),
        );
    }
}
