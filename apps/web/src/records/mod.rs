//! Typed CRUD over the three record tables. Each operation is a single
//! store call; failures are logged here with the table and row id, then
//! returned for the HTTP layer to map to a 5xx.

pub mod handlers;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use crate::models::{AcademicRecord, Student, SubjectScores};
use crate::store::{to_row, Query, Row, StoreError, Table, TableStore};

/// A row type read back from one of the record tables.
pub trait Entity: DeserializeOwned {
    const TABLE: Table;
}

impl Entity for Student {
    const TABLE: Table = Table::Students;
}

impl Entity for AcademicRecord {
    const TABLE: Table = Table::AcademicInfo;
}

impl Entity for SubjectScores {
    const TABLE: Table = Table::Subjects;
}

/// Up to `LIST_LIMIT` rows, most recent id first.
pub async fn list<E: Entity>(store: &dyn TableStore) -> Result<Vec<E>, StoreError> {
    let table = E::TABLE;
    let rows = store
        .select(table, Query::newest_first())
        .await
        .inspect_err(|e| error!(table = %table, "list failed: {e}"))?;

    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|source| StoreError::Decode { table, source }))
        .collect::<Result<Vec<E>, _>>()
        .inspect_err(|e| error!(table = %table, "{e}"))
}

pub async fn insert<P: Serialize>(
    store: &dyn TableStore,
    table: Table,
    payload: &P,
) -> Result<(), StoreError> {
    let row = to_row(table, payload)?;
    let key = identifying_field(&row);
    store
        .insert(table, row)
        .await
        .inspect_err(|e| error!(table = %table, key = %key, "insert failed: {e}"))?;
    info!(table = %table, key = %key, "Inserted row");
    Ok(())
}

/// `student_id=…` for academic and score rows, `email=…` for students.
/// New rows have no primary key yet, so this is what ties a log line to the request.
fn identifying_field(row: &Row) -> String {
    ["student_id", "email"]
        .into_iter()
        .find_map(|column| {
            row.get(column).map(|value| match value.as_str() {
                Some(text) => format!("{column}={text}"),
                None => format!("{column}={value}"),
            })
        })
        .unwrap_or_else(|| "-".to_string())
}

pub async fn update<P: Serialize>(
    store: &dyn TableStore,
    table: Table,
    id: i64,
    payload: &P,
) -> Result<(), StoreError> {
    let row = to_row(table, payload)?;
    store
        .update(table, id, row)
        .await
        .inspect_err(|e| error!(table = %table, id, "update failed: {e}"))?;
    info!(table = %table, id, "Updated row");
    Ok(())
}

/// Deleting an id the store does not hold is not an error.
pub async fn delete(store: &dyn TableStore, table: Table, id: i64) -> Result<(), StoreError> {
    store
        .delete(table, id)
        .await
        .inspect_err(|e| error!(table = %table, id, "delete failed: {e}"))?;
    info!(table = %table, id, "Deleted row");
    Ok(())
}
