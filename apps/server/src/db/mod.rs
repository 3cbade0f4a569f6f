//! Record store for bot records.
//!
//! The server only needs insert, list and lookup-by-hash over a single
//! `sites` collection, so the store is a narrow trait with a hosted
//! Supabase implementation and an in-memory one for development and tests.

pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreSettings;
use crate::models::BotRecord;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// Table holding bot records.
pub const SITES_TABLE: &str = "sites";

/// How many bots `listbots` returns.
pub const LIST_LIMIT: usize = 10;

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store request failed: {0}")]
    Transport(String),

    /// The store answered with an error
    #[error("Store rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// The store answered with something we could not read
    #[error("Unreadable store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Message suitable for an `{error}` response body.
    pub fn client_message(&self) -> String {
        match self {
            StoreError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Persistence operations the bot service relies on.
///
/// No update or delete exists: records are written once and kept.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// Persist a new record. Hash uniqueness is not enforced.
    async fn insert(&self, record: &BotRecord) -> Result<(), StoreError>;

    /// Up to `limit` records in the store's default order.
    async fn list_recent(&self, limit: usize) -> Result<Vec<BotRecord>, StoreError>;

    /// Every record, for the explore page.
    async fn list_all(&self) -> Result<Vec<BotRecord>, StoreError>;

    /// First record with the given hash.
    async fn get_by_hash(&self, hash: &str) -> Result<Option<BotRecord>, StoreError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Build the configured store.
pub fn connect(settings: &StoreSettings) -> Result<Arc<dyn BotStore>, StoreError> {
    match settings {
        StoreSettings::Supabase { url, key } => Ok(Arc::new(SupabaseStore::new(url, key.clone())?)),
        StoreSettings::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
