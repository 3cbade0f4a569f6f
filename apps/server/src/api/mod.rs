//! API endpoint modules.

pub mod bots;
pub mod explore;
pub mod health;
pub mod openapi;

pub use bots::configure_routes as configure_bot_routes;
pub use explore::configure_routes as configure_explore_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
