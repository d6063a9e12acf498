//! In-process table store for local development (`STORE_BACKEND=memory`)
//! and router tests. Ids are assigned per table starting at 1.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::store::{Query, Row, StoreError, Table, TableStore};

#[derive(Default)]
struct MemTable {
    last_id: i64,
    rows: BTreeMap<i64, Row>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Table, MemTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Table, MemTable>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub fn len(&self, table: Table) -> usize {
        self.lock().get(&table).map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.lock();
        let Some(t) = tables.get(&table) else {
            return Ok(Vec::new());
        };
        let limit = query.limit.unwrap_or(usize::MAX);
        let rows: Vec<Value> = if query.descending {
            t.rows.values().rev().take(limit).cloned().map(Value::Object).collect()
        } else {
            t.rows.values().take(limit).cloned().map(Value::Object).collect()
        };
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let t = tables.entry(table).or_default();
        t.last_id += 1;
        let id = t.last_id;
        row.insert(table.primary_key().to_string(), Value::from(id));
        row.entry("created_at")
            .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));
        t.rows.insert(id, row);
        Ok(())
    }

    async fn update(&self, table: Table, id: i64, changes: Row) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.get_mut(&table).and_then(|t| t.rows.get_mut(&id)) {
            for (column, value) in changes {
                if column != table.primary_key() {
                    existing.insert(column, value);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), StoreError> {
        if let Some(t) = self.lock().get_mut(&table) {
            t.rows.remove(&id);
        }
        Ok(())
    }
}
