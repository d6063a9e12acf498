//! Hosted REST table API (Supabase / PostgREST).
//!
//! select → `GET /rest/v1/{table}?select=*&order={pk}.desc&limit=N`
//! insert → `POST /rest/v1/{table}`
//! update → `PATCH /rest/v1/{table}?{pk}=eq.{id}`
//! delete → `DELETE /rest/v1/{table}?{pk}=eq.{id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::store::{Query, Row, StoreError, Table, TableStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(project_url: &str, api_key: String) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            api_key,
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.rest_url, table.name())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn eq_filter(table: Table, id: i64) -> [(&'static str, String); 1] {
        [(table.primary_key(), format!("eq.{id}"))]
    }
}

/// Maps non-2xx responses to `StoreError::Api`, preferring PostgREST's message.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<PostgrestErrorBody>(&body) {
        Ok(PostgrestErrorBody {
            message,
            details: Some(details),
        }) => format!("{message} ({details})"),
        Ok(PostgrestErrorBody { message, .. }) => message,
        Err(_) => body,
    };
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TableStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError> {
        let direction = if query.descending { "desc" } else { "asc" };
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", format!("{}.{direction}", table.primary_key())),
        ];
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let response = self.request(Method::GET, table).query(&params).send().await?;
        let rows: Vec<Value> = check(response).await?.json().await?;
        debug!("Selected {} rows from {table}", rows.len());
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn update(&self, table: Table, id: i64, changes: Row) -> Result<(), StoreError> {
        let response = self
            .request(Method::PATCH, table)
            .query(&Self::eq_filter(table, id))
            .header("Prefer", "return=minimal")
            .json(&changes)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, table)
            .query(&Self::eq_filter(table, id))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
