//! Reply strategies for answering a message as a bot.
//!
//! Exactly one strategy is chosen at startup from [`ReplySettings`] and
//! injected into the bot service. Strategies never fail: provider errors
//! degrade to fixed sentinel replies.

pub mod chat;
pub mod inference;
pub mod local;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ReplySettings;

pub use chat::ChatCompletionReply;
pub use inference::TextGenerationReply;
pub use local::LocalReply;

/// Reply when the chat-completion provider fails.
pub const CHAT_FAILURE_REPLY: &str = "⚠️ Bot failed to respond (OpenRouter error)";

/// Reply when the inference provider fails.
pub const INFERENCE_FAILURE_REPLY: &str = "⚠️ Bot failed to respond (inference error)";

/// Reply when a provider answers without text.
pub const EMPTY_REPLY: &str = "🤖 No reply generated.";

/// HTTP connect timeout for provider calls.
const PROVIDER_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for provider calls.
const PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Produces a reply for a bot with the given description.
#[async_trait]
pub trait ReplyStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Answer `message` in the voice of `description`. Never fails.
    async fn reply(&self, description: &str, message: &str) -> String;
}

/// Single-turn prompt shared by the remote strategies.
pub fn build_prompt(description: &str, message: &str) -> String {
    format!(
        "You are a bot with this description: \"{}\". Respond conversationally to the user message: \"{}\".",
        description, message
    )
}

/// Build the strategy selected by configuration. `None` disables replies.
pub fn from_settings(
    settings: &ReplySettings,
) -> Result<Option<Arc<dyn ReplyStrategy>>, reqwest::Error> {
    let strategy: Arc<dyn ReplyStrategy> = match settings {
        ReplySettings::Disabled => return Ok(None),
        ReplySettings::Local => Arc::new(LocalReply),
        ReplySettings::ChatCompletion(chat) => Arc::new(ChatCompletionReply::new(chat)?),
        ReplySettings::TextGeneration(inference) => {
            Arc::new(TextGenerationReply::new(inference)?)
        }
    };
    Ok(Some(strategy))
}

/// HTTP client shared by the remote strategies.
fn provider_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(PROVIDER_CONNECT_TIMEOUT)
        .timeout(PROVIDER_REQUEST_TIMEOUT)
        .build()
}
