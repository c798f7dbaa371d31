use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::json::{json_response, JsonBody};

/// Pre-encoded body for internal failures; encoding it cannot fail again.
const INTERNAL_ERROR_BODY: &[u8] = br#"{"error": "internal server error"}"#;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("Failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Payload of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => JsonBody(
                self.status(),
                ErrorBody {
                    error: self.to_string(),
                },
            )
            .into_response(),
            AppError::Encode(_) => {
                tracing::error!("Internal error: {:?}", self);
                json_response(self.status(), INTERNAL_ERROR_BODY.to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, Vec<u8>) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error": "not found"}"#);
    }

    #[tokio::test]
    async fn test_encode_failure_is_internal_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let (status, body) = body_of(AppError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_BODY);
    }
}
