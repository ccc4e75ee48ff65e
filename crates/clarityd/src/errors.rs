//! HTTP error mapping.
//!
//! - missing or invalid input -> 400
//! - dependency unavailable   -> 503 (no credential configured)
//! - generator / bad JSON     -> 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clarity_shared::ClarityError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} is too long (max {1} characters)")]
    TooLong(&'static str, usize),

    #[error(transparent)]
    Clarity(#[from] ClarityError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::TooLong(..) => StatusCode::BAD_REQUEST,
            ApiError::Clarity(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Clarity(ClarityError::MissingCredential(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Clarity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_server_error() {
            error!("Request failed: {}", self);
            let error = if status == StatusCode::SERVICE_UNAVAILABLE {
                "Service unavailable"
            } else {
                "Internal error"
            };
            json!({ "error": error, "details": self.to_string() })
        } else {
            json!({ "error": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::TooLong("rawText", 10).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ClarityError::MissingCredential("OPENAI_API_KEY".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ClarityError::MalformedResponse("eof".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ClarityError::MissingInput("rawText".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ClarityError::InvalidRequest("not JSON".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_input_message() {
        let err = ApiError::from(ClarityError::MissingInput("rawText".into()));
        assert_eq!(err.to_string(), "rawText is required");
    }
}
