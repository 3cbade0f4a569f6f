//! Bot lifecycle: create, list, fetch and reply.
//!
//! Shared by the HTTP router and the line CLI.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::db::{BotStore, LIST_LIMIT};
use crate::error::{AppError, AppResult};
use crate::models::{BotRecord, CreatedBot};
use crate::services::keys::{new_access_key, new_display_name, new_identifier};
use crate::services::moderation::is_harmful;
use crate::services::reply::ReplyStrategy;
use crate::services::templater::{ScriptFlavor, render_script};

/// Bot operations over an injected store and reply strategy.
#[derive(Clone)]
pub struct BotService {
    store: Arc<dyn BotStore>,
    reply: Option<Arc<dyn ReplyStrategy>>,
    flavor: ScriptFlavor,
}

impl BotService {
    pub fn new(
        store: Arc<dyn BotStore>,
        reply: Option<Arc<dyn ReplyStrategy>>,
        flavor: ScriptFlavor,
    ) -> Self {
        Self {
            store,
            reply,
            flavor,
        }
    }

    /// The underlying store, for probes and the explore page.
    pub fn store(&self) -> &Arc<dyn BotStore> {
        &self.store
    }

    /// Generate, screen and persist a new bot.
    ///
    /// Rejected content is never written to the store.
    pub async fn create_bot(&self, description: &str) -> AppResult<CreatedBot> {
        info!("Creating bot with description: {}", description);

        let hash = new_identifier();
        let api_key = new_access_key();
        let files = render_script(description, &api_key, self.flavor);

        if is_harmful(&files) {
            warn!(hash = %hash, "Bot contains harmful content, aborting");
            return Err(AppError::HarmfulContent);
        }

        let record = BotRecord {
            id: None,
            name: new_display_name(),
            description: description.to_string(),
            files,
            hash: hash.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            api_key: api_key.clone(),
            extra: Default::default(),
        };

        self.store.insert(&record).await.map_err(|e| {
            error!("Store insert error: {}", e);
            AppError::from(e)
        })?;

        info!(hash = %hash, "Bot created successfully");
        Ok(CreatedBot { hash, api_key })
    }

    /// Up to ten bots. Store failures yield an empty list.
    pub async fn list_bots(&self) -> Vec<BotRecord> {
        match self.store.list_recent(LIST_LIMIT).await {
            Ok(bots) => bots,
            Err(e) => {
                error!("Error fetching bots: {}", e);
                Vec::new()
            }
        }
    }

    /// Look up a bot by hash. Store failures read as not found.
    pub async fn get_bot(&self, hash: &str) -> AppResult<BotRecord> {
        match self.store.get_by_hash(hash).await {
            Ok(Some(bot)) => Ok(bot),
            Ok(None) => Err(AppError::bot_not_found()),
            Err(e) => {
                error!(hash = %hash, "Error fetching bot: {}", e);
                Err(AppError::bot_not_found())
            }
        }
    }

    /// Reply as `bot`, or `None` when replies are disabled.
    pub async fn reply_as(&self, bot: &BotRecord, message: &str) -> Option<String> {
        let strategy = self.reply.as_ref()?;
        let reply = strategy.reply(&bot.description, message).await;
        info!(hash = %bot.hash, strategy = strategy.name(), "Reply generated");
        Some(reply)
    }
}
