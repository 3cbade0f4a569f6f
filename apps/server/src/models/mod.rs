//! Domain models for the bot server.

pub mod bot;

pub use bot::{BOT_SCRIPT_FILE, BotFiles, BotQuery, BotRecord, BotReply, CreatedBot};
