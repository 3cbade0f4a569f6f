//! Business logic services.

pub mod bots;
pub mod keys;
pub mod moderation;
pub mod reply;
pub mod templater;

pub use bots::BotService;
pub use reply::ReplyStrategy;
pub use templater::ScriptFlavor;
