//! Template reply with no network call.

use async_trait::async_trait;

use super::ReplyStrategy;

/// Echoes the message followed by the bot's description.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalReply;

/// `You said: '<message>'. <description>`
pub fn local_reply(description: &str, message: &str) -> String {
    format!("You said: '{}'. {}", message, description)
}

#[async_trait]
impl ReplyStrategy for LocalReply {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn reply(&self, description: &str, message: &str) -> String {
        local_reply(description, message)
    }
}
