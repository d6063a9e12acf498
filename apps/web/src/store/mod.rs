//! Record store adapter: a thin table-oriented client over the hosted
//! backend. Every call is a direct passthrough: no local transactions,
//! validation or retries.
//!
//! `AppState` holds an `Arc<dyn TableStore>`, chosen at startup from
//! `STORE_BACKEND`.

pub mod memory;
pub mod postgres;
pub mod postgrest;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use postgrest::PostgrestStore;

/// Upper bound on rows returned by any list query.
pub const LIST_LIMIT: usize = 5000;

/// A single row payload, keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Students,
    AcademicInfo,
    Subjects,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Students => "student_data",
            Table::AcademicInfo => "academic_info",
            Table::Subjects => "subjects",
        }
    }

    pub fn primary_key(self) -> &'static str {
        match self {
            Table::Students => "student_id",
            Table::AcademicInfo => "record_id",
            Table::Subjects => "id",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordering and bound for a select. Rows are always ordered by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub descending: bool,
    pub limit: Option<usize>,
}

impl Query {
    /// Most recent ids first, bounded to `LIST_LIMIT`.
    pub fn newest_first() -> Self {
        Self {
            descending: true,
            limit: Some(LIST_LIMIT),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode {table} row: {source}")]
    Decode {
        table: Table,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid payload for {table}: {detail}")]
    Payload { table: Table, detail: String },
}

/// The generic table client every backend implements.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Backend name for logs and the health probe.
    fn backend(&self) -> &'static str;

    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError>;

    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError>;

    async fn update(&self, table: Table, id: i64, changes: Row) -> Result<(), StoreError>;

    async fn delete(&self, table: Table, id: i64) -> Result<(), StoreError>;
}

/// Serializes a typed payload into a column map.
pub fn to_row<T: Serialize>(table: Table, payload: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(other) => Err(StoreError::Payload {
            table,
            detail: format!("expected a non-empty object, got {other}"),
        }),
        Err(source) => Err(StoreError::Decode { table, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_names_and_keys() {
        assert_eq!(Table::Students.to_string(), "student_data");
        assert_eq!(Table::Students.primary_key(), "student_id");
        assert_eq!(Table::AcademicInfo.name(), "academic_info");
        assert_eq!(Table::AcademicInfo.primary_key(), "record_id");
        assert_eq!(Table::Subjects.name(), "subjects");
        assert_eq!(Table::Subjects.primary_key(), "id");
    }

    #[test]
    fn test_newest_first_is_bounded() {
        let q = Query::newest_first();
        assert!(q.descending);
        assert_eq!(q.limit, Some(5000));
    }

    #[test]
    fn test_to_row_requires_object() {
        let row = to_row(Table::Students, &json!({"first_name": "Ada"})).unwrap();
        assert_eq!(row["first_name"], json!("Ada"));
        assert!(to_row(Table::Students, &json!([1, 2])).is_err());
        assert!(to_row(Table::Students, &json!({})).is_err());
    }
}
