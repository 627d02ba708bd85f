use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::ChatError;
use crate::report::generator::ReportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every error renders as `{"error": {"code", "message"}}` with a stable
/// machine-readable code; raw exception detail never crosses this boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Chat(e) => {
                let status = chat_status(e);
                if status.is_server_error() {
                    tracing::error!("chat pipeline error: {e}");
                }
                (status, e.kind(), e.to_string())
            }
            AppError::Report(e) => (StatusCode::BAD_REQUEST, e.kind(), e.to_string()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "This endpoint is not yet implemented".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn chat_status(err: &ChatError) -> StatusCode {
    match err {
        ChatError::EmptyMessage | ChatError::MissingCredential => StatusCode::BAD_REQUEST,
        ChatError::UpstreamUnauthorized => StatusCode::UNAUTHORIZED,
        ChatError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
        ChatError::UpstreamServerError { .. }
        | ChatError::NetworkUnreachable
        | ChatError::MalformedUpstreamResponse => StatusCode::BAD_GATEWAY,
        ChatError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_rejections_are_bad_request() {
        assert_eq!(chat_status(&ChatError::EmptyMessage), StatusCode::BAD_REQUEST);
        assert_eq!(
            chat_status(&ChatError::MissingCredential),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_statuses_map_to_gateway_codes() {
        assert_eq!(
            chat_status(&ChatError::UpstreamUnauthorized),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            chat_status(&ChatError::UpstreamRateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            chat_status(&ChatError::UpstreamTimeout),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            chat_status(&ChatError::UpstreamServerError {
                status: 503,
                detail: "overloaded".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
