//! The table engine: schema-bound record storage with validation and
//! scan-based query operations.
//!
//! A record is either absent or present; every mutation is a validate,
//! then a full replace-merge. All validation failures are synchronous and
//! leave the table unchanged.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::error::{NestDbError, Result};
use crate::query::Query;
use crate::record::{FieldMap, Record};
use crate::rowid;
use crate::schema::{TableOptions, TableSchema};
use crate::validation;

/// A schema-bound collection of records. Name, creation timestamp, schema,
/// and options are fixed at creation; only the records are mutable.
///
/// Records keep insertion order, which is the scan order of every
/// `*_where` operation.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    created_at: DateTime<Utc>,
    schema: TableSchema,
    options: TableOptions,
    records: IndexMap<String, Record>,
}

impl Table {
    pub(crate) fn new(name: String, schema: TableSchema, options: TableOptions) -> Self {
        Self {
            name,
            created_at: Utc::now(),
            schema,
            options,
            records: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a new record. Validates unknown columns, type tags, and unique
    /// constraints before anything is written; on any failure the table is
    /// unchanged. Returns the freshly-created record.
    pub fn insert_one(&mut self, data: FieldMap) -> Result<&Record> {
        validation::check_known_columns(&self.name, &self.schema, &data)?;
        validation::check_types(&self.name, &self.schema, &data)?;
        if self.options.unique_constraints && !self.records.is_empty() {
            validation::check_unique(&self.name, &self.schema, &data, self.records.values())?;
        }

        let row_id = rowid::generate();
        let record = Record::new(row_id.clone(), data, self.options.timestamp_data);
        let entry = self.records.entry(row_id).or_insert(record);
        Ok(&*entry)
    }

    /// Merge `data` into an existing record. Runs the same unknown-column,
    /// type, and uniqueness checks as insert, plus the editability check.
    /// Keys absent from `data` are untouched; `updated_at` is bumped.
    ///
    /// The uniqueness scan includes the record being updated, so
    /// re-submitting a record's own unchanged unique value is rejected as a
    /// collision.
    pub fn update_one(&mut self, row_id: &str, data: FieldMap) -> Result<&Record> {
        if !self.records.contains_key(row_id) {
            return Err(NestDbError::RecordNotFound(format!(
                "no record '{row_id}' in table '{}'",
                self.name
            )));
        }

        validation::check_known_columns(&self.name, &self.schema, &data)?;
        validation::check_editable(&self.name, &self.schema, &data)?;
        validation::check_types(&self.name, &self.schema, &data)?;
        if self.options.unique_constraints {
            validation::check_unique(&self.name, &self.schema, &data, self.records.values())?;
        }

        let Some(record) = self.records.get_mut(row_id) else {
            return Err(NestDbError::RecordNotFound(format!(
                "no record '{row_id}' in table '{}'",
                self.name
            )));
        };
        for (column, value) in data {
            record.fields_mut().insert(column, value);
        }
        record.touch();
        Ok(&*record)
    }

    /// Remove and return a record. An unknown id is not an error: the result
    /// is simply `None` and the table is unchanged.
    pub fn delete(&mut self, row_id: &str) -> Option<Record> {
        self.records.shift_remove(row_id)
    }

    /// Direct field-map lookup by row id, no scan.
    pub fn find_one(&self, row_id: &str) -> Option<&FieldMap> {
        self.records.get(row_id).map(Record::fields)
    }

    /// Mutable access to a single record, for in-place field replacement via
    /// [`Record::set_fields`]. Bypasses schema validation; the caller keeps
    /// the fields consistent with the table's schema.
    pub fn record_mut(&mut self, row_id: &str) -> Option<&mut Record> {
        self.records.get_mut(row_id)
    }

    /// Full scan in insertion order; the first record whose field named
    /// `query.column` equals `query.value`. A miss is an error only when
    /// the query opts into `throw_on_miss`.
    pub fn find_where(&self, query: &Query) -> Result<Option<&Record>> {
        let found = self
            .records
            .values()
            .find(|record| record.fields().get(&query.column) == Some(&query.value));

        match found {
            Some(record) => Ok(Some(record)),
            None if query.throw_on_miss => Err(self.miss(query)),
            None => Ok(None),
        }
    }

    /// Apply `update_one` to every record matching `query`, or only the
    /// first-inserted match when `affect_all` is false.
    pub fn update_where(&mut self, query: &Query, data: &FieldMap, affect_all: bool) -> Result<()> {
        // Snapshot ids first so the scan never observes its own mutations.
        let matches = self.matching_ids(query, affect_all);
        if matches.is_empty() && query.throw_on_miss {
            return Err(self.miss(query));
        }
        for row_id in matches {
            self.update_one(&row_id, data.clone())?;
        }
        Ok(())
    }

    /// Delete every record matching `query`, or only the first-inserted
    /// match when `multiple` is false.
    pub fn delete_where(&mut self, query: &Query, multiple: bool) -> Result<()> {
        let matches = self.matching_ids(query, multiple);
        if matches.is_empty() && query.throw_on_miss {
            return Err(self.miss(query));
        }
        for row_id in &matches {
            self.records.shift_remove(row_id);
        }
        Ok(())
    }

    /// Read-only export of all records in insertion order.
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records
            .iter()
            .map(|(row_id, record)| (row_id.as_str(), record))
    }

    fn matching_ids(&self, query: &Query, all: bool) -> Vec<String> {
        let mut matches = Vec::new();
        for (row_id, record) in &self.records {
            if record.fields().get(&query.column) == Some(&query.value) {
                matches.push(row_id.clone());
                if !all {
                    break;
                }
            }
        }
        matches
    }

    fn miss(&self, query: &Query) -> NestDbError {
        NestDbError::RecordNotFound(format!(
            "no record in table '{}' where {} = {:?}",
            self.name, query.column, query.value
        ))
    }
}

#[cfg(test)]
mod tests;
