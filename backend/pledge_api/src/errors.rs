//! Application-wide error types.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use pledge::PledgeError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Pledge(#[from] PledgeError),

    #[error("Upstream payload rejected: {0}")]
    UpstreamPayload(PledgeError),

    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No pledge snapshot was produced")]
    NoSnapshot,
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Pledge(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Http(_) | Self::Upstream { .. } | Self::UpstreamPayload(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Config(_) | Self::NoSnapshot => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
