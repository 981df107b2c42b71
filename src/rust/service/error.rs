use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// Body returned for every failed request.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Why a request failed. Callers only ever see a generic 500; the variant is
/// for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Request content type must be JSON, got {0}")]
    UnsupportedContentType(String),
    #[error("Failed to read request body: {0}")]
    BodyRead(#[from] BytesRejection),
    #[error("Classification failed: {0}")]
    Classification(#[from] ClassifierError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("/sentiment request failed: {:#}", anyhow::Error::from(self));

        let body = ErrorBody {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
