use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::{NestDbError, Result};
use crate::schema::{TableOptions, TableSchema};
use crate::table::Table;

/// A registry of uniquely-named tables. Created through
/// [`crate::Store::create_database`], never standalone.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    created_at: DateTime<Utc>,
    tables: HashMap<String, Table>,
}

impl Database {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            created_at: Utc::now(),
            tables: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Create a table with the given schema and options.
    /// Fails `TableExists` if the name is taken; never overwrites.
    pub fn create_table(
        &mut self,
        name: &str,
        schema: TableSchema,
        options: TableOptions,
    ) -> Result<&mut Table> {
        if self.tables.contains_key(name) {
            return Err(NestDbError::TableExists(name.to_string()));
        }

        let table = Table::new(name.to_string(), schema, options);
        Ok(self.tables.entry(name.to_string()).or_insert(table))
    }

    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| NestDbError::TableDoesNotExist(name.to_string()))
    }

    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| NestDbError::TableDoesNotExist(name.to_string()))
    }

    /// Drop a table and every record in it. Unlike
    /// [`crate::Store::delete_database`], dropping an unknown table is an
    /// error.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(NestDbError::TableDoesNotExist(name.to_string()));
        }
        Ok(())
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, ColumnType};

    fn users_schema() -> TableSchema {
        TableSchema::new().column("username", ColumnSpec::of(ColumnType::String))
    }

    #[test]
    fn test_create_and_get_table() {
        let mut db = Database::new("app".to_string());
        db.create_table("users", users_schema(), TableOptions::default())
            .unwrap();

        let table = db.get_table("users").unwrap();
        assert_eq!(table.name(), "users");
        assert_eq!(table.schema().len(), 1);
    }

    #[test]
    fn test_create_duplicate_table_fails() {
        let mut db = Database::new("app".to_string());
        db.create_table("users", users_schema(), TableOptions::default())
            .unwrap();

        let err = db
            .create_table("users", TableSchema::new(), TableOptions::default())
            .unwrap_err();
        assert!(matches!(err, NestDbError::TableExists(name) if name == "users"));

        // The original table was not overwritten.
        assert_eq!(db.get_table("users").unwrap().schema().len(), 1);
    }

    #[test]
    fn test_get_missing_table_fails() {
        let db = Database::new("app".to_string());
        let err = db.get_table("users").unwrap_err();
        assert!(matches!(err, NestDbError::TableDoesNotExist(_)));
    }

    #[test]
    fn test_drop_table_is_strict() {
        let mut db = Database::new("app".to_string());
        db.create_table("users", users_schema(), TableOptions::default())
            .unwrap();

        db.drop_table("users").unwrap();
        assert!(db.is_empty());

        let err = db.drop_table("users").unwrap_err();
        assert!(matches!(err, NestDbError::TableDoesNotExist(_)));
    }
}
