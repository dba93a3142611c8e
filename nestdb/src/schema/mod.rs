mod parser;

pub use parser::{parse_schema, parse_schema_str};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column type enumeration. The sole source of truth for what a field value
/// may look like; checked by exhaustive tag match against [`crate::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Timestamp,
    Structured,
    Null,
}

impl ColumnType {
    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Structured => "structured",
            ColumnType::Null => "null",
        }
    }
}

/// Per-column declaration: type, editability, and uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default)]
    pub unique: bool,
}

fn default_editable() -> bool {
    true
}

impl ColumnSpec {
    /// An editable, non-unique column of the given type.
    pub fn of(column_type: ColumnType) -> Self {
        Self {
            column_type,
            editable: true,
            unique: false,
        }
    }

    /// Mark the column as non-editable after insert.
    pub fn readonly(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Mark the column as unique across the table.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Ordered mapping of column name to [`ColumnSpec`]. Declaration order is
/// preserved; it is the order columns appear in snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: IndexMap<String, ColumnSpec>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add a column. Re-declaring a name replaces the spec
    /// but keeps the original position.
    pub fn column(mut self, name: impl Into<String>, spec: ColumnSpec) -> Self {
        self.columns.insert(name.into(), spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSpec)> {
        self.columns.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Names of columns flagged unique, in declaration order.
    pub fn unique_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|(_, spec)| spec.unique)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Table-level options, fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOptions {
    /// Mirror `created_at`/`updated_at` as ordinary fields in each record's
    /// value map so exported snapshots are self-describing.
    ///
    /// While this is on, those two field names are reserved: values a caller
    /// supplies under them pass validation but are overwritten by the mirror
    /// on every insert and update.
    #[serde(default = "default_flag")]
    pub timestamp_data: bool,
    /// Enforce unique-column constraints on insert and update.
    #[serde(default = "default_flag")]
    pub unique_constraints: bool,
}

fn default_flag() -> bool {
    true
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            timestamp_data: true,
            unique_constraints: true,
        }
    }
}

/// A full table declaration as it appears in a schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDefinition {
    #[serde(default)]
    pub columns: TableSchema,
    #[serde(default)]
    pub options: Option<TableOptions>,
}

/// Top-level schema definition parsed from a schema.yaml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub tables: IndexMap<String, TableDefinition>,
}
