pub mod database;
pub mod error;
pub mod query;
pub mod record;
pub mod rowid;
pub mod schema;
pub mod store;
pub mod table;
pub mod validation;
pub mod value;

pub use database::Database;
pub use error::{NestDbError, Result};
pub use query::Query;
pub use record::{FieldMap, Record};
pub use schema::{ColumnSpec, ColumnType, SchemaDefinition, TableOptions, TableSchema};
pub use store::Store;
pub use table::Table;
pub use value::Value;
