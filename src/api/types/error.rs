//! HTTP error types

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Message returned while the issuance cooldown is active
pub const COOLDOWN_MESSAGE: &str = "Please wait before generating a new key.";

/// Message returned for unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error response body
///
/// Rate limiting answers with `{"message": ...}`, failures with `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Message { message: String },
    Error { error: String },
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    /// Create an error with an `{"error": ...}` body
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody::Error {
                error: message.into(),
            },
            retry_after_secs: None,
        }
    }

    /// Rate limit error with a `Retry-After` hint
    pub fn rate_limited(message: impl Into<String>, retry_after_ms: i64) -> Self {
        let retry_after_secs = u64::try_from(retry_after_ms.max(0))
            .unwrap_or_default()
            .div_ceil(1000);

        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: ApiErrorBody::Message {
                message: message.into(),
            },
            retry_after_secs: Some(retry_after_secs),
        }
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();

        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Cooldown { retry_after_ms } => {
                Self::rate_limited(COOLDOWN_MESSAGE, *retry_after_ms)
            }
            DomainError::Storage { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            ApiErrorBody::Message { message } => write!(f, "{}: {}", self.status, message),
            ApiErrorBody::Error { error } => write!(f, "{}: {}", self.status, error),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_maps_to_429() {
        let api_err: ApiError = DomainError::cooldown(1_500).into();

        assert_eq!(api_err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            api_err.body,
            ApiErrorBody::Message {
                message: COOLDOWN_MESSAGE.to_string()
            }
        );
        assert_eq!(api_err.retry_after_secs, Some(2));
    }

    #[test]
    fn test_storage_maps_to_500_without_detail() {
        let api_err: ApiError = DomainError::storage("permission denied: /var/keys.json").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            api_err.body,
            ApiErrorBody::Error {
                error: INTERNAL_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_internal_maps_to_500() {
        let api_err: ApiError = DomainError::internal("Lock task failed: panicked").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.retry_after_secs, None);
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(ApiErrorBody::Error {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));

        let json = serde_json::to_value(ApiErrorBody::Message {
            message: "wait".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "message": "wait" }));
    }

    #[test]
    fn test_retry_after_header() {
        let response = ApiError::rate_limited("wait", 86_399_000).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "86399"
        );
    }

    #[test]
    fn test_all_error_types() {
        assert_eq!(
            ApiError::rate_limited("", 0).status,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::internal("").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
