//! Error responses for the JSON API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use combat_dna_core::Error as CoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Core(e) => match e {
                CoreError::MalformedDuration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::InvalidVote(_) => StatusCode::BAD_REQUEST,
                CoreError::Http(_) | CoreError::Store(_) => StatusCode::BAD_GATEWAY,
                CoreError::Database(_) | CoreError::Json(_) | CoreError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
