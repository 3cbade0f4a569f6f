//! Domain error types for the bot server.
//!
//! Every failure that reaches the HTTP boundary becomes a single
//! `{"error": "..."}` response.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::db::StoreError;

/// Message returned when moderation rejects a generated bot.
pub const HARMFUL_CONTENT_MESSAGE: &str = "Harmful content detected";

/// Message returned when a hash has no record.
pub const BOT_NOT_FOUND_MESSAGE: &str = "Bot not found";

/// Message returned when no branch of the bot router matches.
pub const INVALID_ACTION_MESSAGE: &str = "Invalid action or missing description";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Record store rejected or failed an operation
    #[error("{message}")]
    Store {
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Request did not match any supported action
    #[error("{0}")]
    InvalidInput(String),

    /// Generated files tripped the content screener
    #[error("Harmful content detected")]
    HarmfulContent,

    /// Anything unexpected; the raw message is returned to the caller
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bot_not_found() -> Self {
        AppError::NotFound(BOT_NOT_FOUND_MESSAGE.to_string())
    }

    pub fn invalid_action() -> Self {
        AppError::InvalidInput(INVALID_ACTION_MESSAGE.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // Moderation rejection keeps the 500 clients already rely on.
            AppError::HarmfulContent | AppError::Store { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = ErrorResponse::new(self.to_string());
        match self {
            AppError::Store {
                message,
                details,
                hint,
            } => {
                tracing::error!("Store error: {}", message);
                body.details = details.clone();
                body.hint = hint.clone();
            }
            AppError::Internal(err_str) => tracing::error!("Handler caught error: {}", err_str),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Store-provided detail, on store failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Store-provided hint, on store failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            hint: None,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected {
                message,
                details,
                hint,
                ..
            } => AppError::Store {
                message,
                details,
                hint,
            },
            other => AppError::Store {
                message: other.client_message(),
                details: None,
                hint: None,
            },
        }
    }
}
