//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Botnest Server",
        version = "0.1.0",
        description = "Create bots from a description, list them, and chat with them through a configurable reply strategy"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Bot endpoint
        api::bots::handle_bot,
        // Explore page
        api::explore::explore,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Bots
            models::BotRecord,
            models::BotReply,
            models::BotQuery,
            models::CreatedBot,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Bots", description = "Bot creation, lookup and replies"),
        (name = "Explore", description = "HTML listing of every bot")
    )
)]
pub struct ApiDoc;
