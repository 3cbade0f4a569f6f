//! Supabase record store over the PostgREST interface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error};

use super::{BotStore, SITES_TABLE, StoreError};
use crate::models::BotRecord;

/// HTTP connect timeout for store requests.
const STORE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for store requests.
const STORE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// PostgREST error payload.
#[derive(Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Client for the hosted `sites` table.
#[derive(Clone)]
pub struct SupabaseStore {
    table_url: String,
    key: SecretString,
    http_client: reqwest::Client,
}

impl SupabaseStore {
    /// Create a store client for the project at `base_url`.
    pub fn new(base_url: &str, key: SecretString) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(STORE_CONNECT_TIMEOUT)
            .timeout(STORE_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            table_url: table_url(base_url),
            key,
            http_client,
        })
    }

    fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let key = self.key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|_| StoreError::Transport("SUPABASE_KEY is not a valid header".into()))?,
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| StoreError::Transport("SUPABASE_KEY is not a valid header".into()))?,
        );
        Ok(headers)
    }

    /// Run a select with extra query pairs and decode the rows.
    async fn select(&self, filters: &[(&str, String)]) -> Result<Vec<BotRecord>, StoreError> {
        let response = self
            .http_client
            .get(select_url(&self.table_url, "*", filters))
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let rows: Vec<BotRecord> = response.json().await?;
        debug!("Store returned {} rows", rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl BotStore for SupabaseStore {
    async fn insert(&self, record: &BotRecord) -> Result<(), StoreError> {
        let response = self
            .http_client
            .post(&self.table_url)
            .headers(self.auth_headers()?)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<BotRecord>, StoreError> {
        self.select(&[("limit", limit.to_string())]).await
    }

    async fn list_all(&self) -> Result<Vec<BotRecord>, StoreError> {
        self.select(&[]).await
    }

    async fn get_by_hash(&self, hash: &str) -> Result<Option<BotRecord>, StoreError> {
        let rows = self
            .select(&[
                ("hash", hash_filter(hash)),
                ("limit", "1".to_string()),
            ])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .http_client
            .get(select_url(&self.table_url, "hash", &[("limit", "1".to_string())]))
            .headers(self.auth_headers()?)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// REST endpoint for the sites table.
fn table_url(base_url: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), SITES_TABLE)
}

/// Select URL with percent-encoded filter values.
fn select_url(table_url: &str, columns: &str, filters: &[(&str, String)]) -> String {
    let mut url = format!("{}?select={}", table_url, columns);
    for (name, value) in filters {
        url.push('&');
        url.push_str(name);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

/// PostgREST equality filter. Values containing reserved PostgREST
/// characters are double-quoted.
fn hash_filter(hash: &str) -> String {
    if hash.contains([',', '.', ':', '(', ')', '"']) {
        format!("eq.\"{}\"", hash.replace('"', "\\\""))
    } else {
        format!("eq.{}", hash)
    }
}

/// Turn a non-success response into a `Rejected` error with the store's message.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(rejection(status.as_u16(), &body))
}

/// Build a `Rejected` error from a PostgREST error body.
fn rejection(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => {
            error!(
                status,
                details = ?err.details,
                hint = ?err.hint,
                "Supabase error: {}",
                err.message.as_deref().unwrap_or("")
            );
            StoreError::Rejected {
                status,
                message: err.message.unwrap_or_else(|| body.to_string()),
                details: err.details,
                hint: err.hint,
            }
        }
        Err(_) => {
            error!(status, "Supabase error: {}", body);
            let message = if body.is_empty() {
                format!("Store request failed with status {}", status)
            } else {
                body.to_string()
            };
            StoreError::Rejected {
                status,
                message,
                details: None,
                hint: None,
            }
        }
    }
}
