//! Bot endpoint.
//!
//! A single resource answers every verb and dispatches on the `action`
//! parameter, merged from the query string and the JSON body.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{BotQuery, BotRecord, BotReply, CreatedBot};
use crate::services::BotService;

/// Action listing recent bots.
pub const ACTION_LIST: &str = "listbots";

/// Action fetching one bot (and optionally replying as it).
pub const ACTION_GET: &str = "getbot";

/// Configure bot routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/bot").to(handle_bot));
}

/// Create, list or fetch bots.
///
/// Branches are tried in order: `listbots`, `getbot` with `id`,
/// POST with `description`, otherwise 400.
#[utoipa::path(
    method(get, post),
    path = "/api/v1/bot",
    tag = "Bots",
    params(BotQuery),
    request_body(content = BotQuery, description = "Same fields as the query string; query values win"),
    responses(
        (status = 200, description = "Bot list, bot record (with `reply` when a message was given), or created bot", body = CreatedBot),
        (status = 400, description = "Invalid action or missing description", body = crate::error::ErrorResponse),
        (status = 404, description = "Bot not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Harmful content, store failure or unexpected error", body = crate::error::ErrorResponse)
    )
)]
pub async fn handle_bot(
    req: HttpRequest,
    body: web::Bytes,
    bots: web::Data<BotService>,
) -> AppResult<HttpResponse> {
    let params = request_params(&req, &body)?;

    info!(
        target: "api",
        action = ?params.action,
        id = ?params.id,
        has_message = params.message.is_some(),
        "Bot request"
    );

    if params.action.as_deref() == Some(ACTION_LIST) {
        let list: Vec<BotRecord> = bots.list_bots().await;
        return Ok(HttpResponse::Ok().json(list));
    }

    if params.action.as_deref() == Some(ACTION_GET)
        && let Some(id) = params.id.as_deref()
    {
        let bot = bots.get_bot(id).await?;

        if let Some(message) = params.message.as_deref()
            && let Some(reply) = bots.reply_as(&bot, message).await
        {
            return Ok(HttpResponse::Ok().json(BotReply { bot, reply }));
        }

        return Ok(HttpResponse::Ok().json(bot));
    }

    if req.method() == Method::POST
        && let Some(description) = params.description.as_deref()
    {
        let created = bots.create_bot(description).await?;
        return Ok(HttpResponse::Ok().json(created));
    }

    Err(AppError::invalid_action())
}

/// Decoded bot parameters from a query string. Repeated keys keep the last value.
pub fn query_params(query_string: &str) -> AppResult<BotQuery> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .into_inner();
    Ok(BotQuery::from_pairs(pairs))
}

/// Merge query string and JSON body; query values take precedence.
fn request_params(req: &HttpRequest, body: &[u8]) -> AppResult<BotQuery> {
    let query = query_params(req.query_string())?;

    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        BotQuery::default()
    } else {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        BotQuery::from_json(&value)
    };

    Ok(query.or(from_body))
}
