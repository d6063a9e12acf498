//! Direct PostgreSQL backend for deployments that reach the database
//! without the REST layer. Rows travel as JSON so the same typed payloads
//! serve both backends.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::store::{Query, Row, StoreError, Table, TableStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and returns a store backed by a small connection pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Comma-separated column list for a payload; keys come from typed inputs
/// but are still checked before being spliced into SQL.
fn column_list(table: Table, row: &Row) -> Result<String, StoreError> {
    if row.is_empty() {
        return Err(StoreError::Payload {
            table,
            detail: "no columns to write".to_string(),
        });
    }
    if let Some(bad) = row.keys().find(|k| !is_identifier(k)) {
        return Err(StoreError::Payload {
            table,
            detail: format!("invalid column name '{bad}'"),
        });
    }
    Ok(row.keys().map(String::as_str).collect::<Vec<_>>().join(", "))
}

pub(crate) fn select_sql(table: Table, query: Query) -> String {
    let direction = if query.descending { "DESC" } else { "ASC" };
    format!(
        "SELECT row_to_json(t) FROM (SELECT * FROM {table} ORDER BY {pk} {direction} LIMIT $1) t",
        table = table.name(),
        pk = table.primary_key(),
    )
}

pub(crate) fn insert_sql(table: Table, columns: &str) -> String {
    format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)",
        table = table.name(),
    )
}

pub(crate) fn update_sql(table: Table, columns: &str) -> String {
    format!(
        "UPDATE {table} SET ({columns}) = (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)) WHERE {pk} = $2",
        table = table.name(),
        pk = table.primary_key(),
    )
}

pub(crate) fn delete_sql(table: Table) -> String {
    format!(
        "DELETE FROM {table} WHERE {pk} = $1",
        table = table.name(),
        pk = table.primary_key(),
    )
}

#[async_trait]
impl TableStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError> {
        // LIMIT NULL means no limit
        let limit = query.limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        Ok(sqlx::query_scalar::<_, Value>(&select_sql(table, query))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
        let columns = column_list(table, &row)?;
        sqlx::query(&insert_sql(table, &columns))
            .bind(Json(&row))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, table: Table, id: i64, changes: Row) -> Result<(), StoreError> {
        let columns = column_list(table, &changes)?;
        sqlx::query(&update_sql(table, &columns))
            .bind(Json(&changes))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), StoreError> {
        sqlx::query(&delete_sql(table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
