//! HTTP error type bridging engine outcomes to responses.

use article_core::ArticleServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};

/// Handler failure rendered as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps an engine error, using `storage_status` for store failures.
    ///
    /// Validation is always 400 and a missing article always 404.
    pub fn from_service(err: ArticleServiceError, storage_status: StatusCode) -> Self {
        let status = match &err {
            ArticleServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ArticleServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ArticleServiceError::Storage(_) => storage_status,
        };
        Self::new(status, err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(value: ArticleServiceError) -> Self {
        Self::from_service(value, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=http_error module=api status=error http_status={} error={}",
                self.status.as_u16(),
                self.message
            );
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
