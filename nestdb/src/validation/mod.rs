//! Field validation for table writes: unknown columns, type tags,
//! editability, and unique constraints. All checks are fail-fast and leave
//! the table untouched; callers run every relevant check before mutating.

use crate::error::{NestDbError, Result};
use crate::record::{FieldMap, Record};
use crate::schema::TableSchema;

/// Every key in `data` must name a schema column.
pub fn check_known_columns(table: &str, schema: &TableSchema, data: &FieldMap) -> Result<()> {
    for column in data.keys() {
        if !schema.contains(column) {
            return Err(NestDbError::UnknownColumn {
                table: table.to_string(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

/// Every value's tag must equal its column's declared type.
/// Assumes `check_known_columns` has already passed.
pub fn check_types(table: &str, schema: &TableSchema, data: &FieldMap) -> Result<()> {
    for (column, value) in data {
        if let Some(spec) = schema.get(column) {
            if !value.matches(spec.column_type) {
                return Err(NestDbError::TypeMismatch {
                    table: table.to_string(),
                    column: column.clone(),
                    expected: spec.column_type.type_name(),
                    actual: value.type_name(),
                });
            }
        }
    }
    Ok(())
}

/// No key in `data` may name a non-editable column.
pub fn check_editable(table: &str, schema: &TableSchema, data: &FieldMap) -> Result<()> {
    for column in data.keys() {
        if let Some(spec) = schema.get(column) {
            if !spec.editable {
                return Err(NestDbError::NotEditable {
                    table: table.to_string(),
                    column: column.clone(),
                });
            }
        }
    }
    Ok(())
}

/// For every unique column present in `data`, no record in `records` may
/// already hold an equal value. The caller decides which records take part
/// in the scan.
pub fn check_unique<'a>(
    table: &str,
    schema: &TableSchema,
    data: &FieldMap,
    records: impl Iterator<Item = &'a Record> + Clone,
) -> Result<()> {
    for column in schema.unique_columns() {
        let Some(candidate) = data.get(column) else {
            continue;
        };
        let collision = records
            .clone()
            .any(|record| record.fields().get(column) == Some(candidate));
        if collision {
            return Err(NestDbError::UniqueConstraint {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}
