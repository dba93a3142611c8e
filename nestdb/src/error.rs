use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestDbError {
    #[error("Database '{0}' already exists")]
    DatabaseExists(String),

    #[error("Database '{0}' does not exist")]
    DatabaseDoesNotExist(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' does not exist")]
    TableDoesNotExist(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Column '{column}' in table '{table}' expects {expected}, got {actual}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unique constraint violated: table '{table}' already holds this value for '{column}'")]
    UniqueConstraint { table: String, column: String },

    #[error("Column '{column}' in table '{table}' is not editable")]
    NotEditable { table: String, column: String },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Data directory is not usable: {0}")]
    InvalidDataDir(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NestDbError>;
