use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentParseError;
use crate::embedder::EmbedderError;

/// Failures of a ranking run.
///
/// `DocumentParse` and `Timeout` belong to one resume and are recorded next to
/// the scored results. `EmbeddingUnavailable` ends the whole run. `InvalidInput`
/// is raised before any work starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    DocumentParse(#[from] DocumentParseError),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing '{identifier}' exceeded {limit:?}")]
    Timeout { identifier: String, limit: Duration },
}

impl From<EmbedderError> for PipelineError {
    fn from(e: EmbedderError) -> Self {
        PipelineError::EmbeddingUnavailable(e.to_string())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidInput(msg) => AppError::Validation(msg),
            PipelineError::EmbeddingUnavailable(msg) => AppError::EmbeddingUnavailable(msg),
            e @ (PipelineError::DocumentParse(_) | PipelineError::Timeout { .. }) => {
                AppError::UnprocessableEntity(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::EmbeddingUnavailable(msg) => {
                tracing::error!("Embedding unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "EMBEDDING_UNAVAILABLE",
                    "The embedding model is unavailable; no resume could be scored".to_string(),
                )
            }
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
