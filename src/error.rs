//! Error types for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("title {0} not found")]
    TitleNotFound(u32),

    #[error("upstream fetch failed: {0}")]
    Upstream(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::TitleNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::TitleNotFound(n) => ApiError::TitleNotFound(n),
            AnalysisError::Upstream(e) => ApiError::Upstream(format!("{e:#}")),
        }
    }
}
