//! API error types with `{ "error", "details"? }` JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::summary::SummaryError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("API key not configured on server")]
    MissingCredential,
    #[error("Upstream returned status {status}")]
    Upstream { status: u16, details: Value },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key not configured on server".to_string(),
                None,
            ),
            ApiError::Upstream { status, details } => {
                tracing::warn!(status, "Chat-completion API returned an error");
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "Error from OpenAI API".to_string(),
                    Some(details),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::MissingCredential => ApiError::MissingCredential,
            SummaryError::Upstream { status, body } => ApiError::Upstream {
                status,
                details: serde_json::from_str(&body).unwrap_or(Value::String(body)),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn json_of(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_without_details() {
        let response = ApiError::BadRequest("Prompt is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"], "Prompt is required");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn missing_credential_returns_500() {
        let response = ApiError::MissingCredential.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_of(response).await["error"], "API key not configured on server");
    }

    #[tokio::test]
    async fn upstream_keeps_status_and_details() {
        let err: ApiError = SummaryError::Upstream {
            status: 429,
            body: r#"{"error":{"message":"Rate limit reached"}}"#.into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = json_of(response).await;
        assert_eq!(json["error"], "Error from OpenAI API");
        assert_eq!(json["details"]["error"]["message"], "Rate limit reached");
    }

    #[tokio::test]
    async fn non_json_upstream_body_becomes_string_details() {
        let err: ApiError = SummaryError::Upstream {
            status: 502,
            body: "Bad Gateway".into(),
        }
        .into();
        assert_eq!(json_of(err.into_response()).await["details"], "Bad Gateway");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let err: ApiError = SummaryError::Connection("https://api.openai.com".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_of(response).await["error"], "Internal server error");
    }
}
