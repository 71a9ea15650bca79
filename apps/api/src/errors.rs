use std::string::FromUtf8Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ModelError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>"}`. Only `Validation` is a
/// client error; everything raised while screening a batch aborts the batch
/// with a 500 carrying the underlying message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to decode '{filename}' as UTF-8 text: {source}")]
    Decode {
        filename: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Decode { .. } | AppError::Model(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Validation(msg) => tracing::debug!("Rejected request: {msg}"),
            AppError::Decode { filename, .. } => {
                tracing::error!(%filename, "Decode error: {}", self)
            }
            AppError::Model(e) => tracing::error!("Model error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
