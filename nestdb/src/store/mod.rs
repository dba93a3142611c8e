use std::collections::HashMap;
use std::path::Path;

use crate::database::Database;
use crate::error::{NestDbError, Result};

/// The root registry of uniquely-named databases. Explicitly-owned
/// application state: create one and pass it by reference into everything
/// that needs it, rather than hiding it behind a process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct Store {
    databases: HashMap<String, Database>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store seeded from a data directory: every immediate
    /// subdirectory becomes an empty database named after it, in whatever
    /// order the filesystem yields. Fails if the path is missing or not a
    /// directory; non-directory entries are skipped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(NestDbError::InvalidDataDir(format!(
                "{} is missing or not a directory",
                path.display()
            )));
        }

        let mut store = Store::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                log::debug!("Skipping non-directory entry {:?}", entry.file_name());
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            store.create_database(&name)?;
        }

        Ok(store)
    }

    /// Create an empty database. Fails `DatabaseExists` if the name is
    /// taken; never overwrites.
    pub fn create_database(&mut self, name: &str) -> Result<&mut Database> {
        if self.databases.contains_key(name) {
            return Err(NestDbError::DatabaseExists(name.to_string()));
        }

        let database = Database::new(name.to_string());
        Ok(self.databases.entry(name.to_string()).or_insert(database))
    }

    pub fn get_database(&self, name: &str) -> Result<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| NestDbError::DatabaseDoesNotExist(name.to_string()))
    }

    pub fn get_database_mut(&mut self, name: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| NestDbError::DatabaseDoesNotExist(name.to_string()))
    }

    /// Delete a database and everything in it. Deleting an unknown name is
    /// a no-op, not an error — unlike [`Database::drop_table`], which is
    /// strict. The asymmetry is deliberate.
    pub fn delete_database(&mut self, name: &str) {
        self.databases.remove(name);
    }

    pub fn databases(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }

    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}
