//! API error handling utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::services::DiagramServiceError;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<DiagramServiceError> for ApiError {
    fn from(e: DiagramServiceError) -> Self {
        match e {
            DiagramServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            DiagramServiceError::Unauthorized => {
                Self::new(StatusCode::UNAUTHORIZED, "Not authorized to access this diagram")
            }
            DiagramServiceError::Storage(e) => {
                error!("Diagram storage failure: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
            "status": self.status.as_u16(),
        });

        (self.status, axum::Json(body)).into_response()
    }
}
