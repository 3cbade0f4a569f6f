//! Process-local record store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BotStore, StoreError};
use crate::models::BotRecord;

/// Insertion-ordered in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<BotRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn insert(&self, record: &BotRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<BotRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().take(limit).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<BotRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get_by_hash(&self, hash: &str) -> Result<Option<BotRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.hash == hash).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
