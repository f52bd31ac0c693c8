use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("not found")]
    NotFound,
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("rate limit exceeded")]
    RateLimitExceeded,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("a reindex is already in progress")]
    ReindexInProgress,

    #[error("catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("embedding error: {0}")]
    Embed(#[from] embed::EmbedError),
    #[error("search error: {0}")]
    Rescue(#[from] rescue::RescueError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] snapshot::SnapshotError),
    #[error("audit error: {0}")]
    Audit(#[from] audit::AuditError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::ReindexInProgress => StatusCode::CONFLICT,
            ServerError::Catalog(catalog::CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Rescue(rescue::RescueError::EmptyQuery) => StatusCode::BAD_REQUEST,
            ServerError::Rescue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Embed(_) | ServerError::Snapshot(_) | ServerError::Audit(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::NotFound => "not_found",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Unauthorized => "unauthorized",
            ServerError::RateLimitExceeded => "rate_limit_exceeded",
            ServerError::PayloadTooLarge => "payload_too_large",
            ServerError::ReindexInProgress => "reindex_in_progress",
            ServerError::Catalog(_) => "catalog_error",
            ServerError::Embed(_) => "embed_error",
            ServerError::Rescue(_) => "search_error",
            ServerError::Snapshot(_) => "snapshot_error",
            ServerError::Audit(_) => "audit_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request_failed");
        }
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
