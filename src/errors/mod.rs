//! Unified error handling with the `{error, message, data}` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Consistent JSON envelope for all API responses.
///
/// `data` is omitted on failures and `details` only appears on failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            error: false,
            message: message.into(),
            data: Some(data),
            details: None,
        })
    }
}

impl ApiResponse<()> {
    /// Envelope that carries only a message.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: false,
            message: message.into(),
            data: None,
            details: None,
        })
    }

    /// Wrap a failure in the envelope.
    pub fn failure(message: impl Into<String>, details: Option<String>) -> Json<Self> {
        Json(Self {
            error: true,
            message: message.into(),
            data: None,
            details,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query failed for {report}: {source}")]
    Query {
        report: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    pub fn query(report: &'static str, source: sqlx::Error) -> Self {
        Self::Query { report, source }
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiResponse::<()>::failure(self.to_string(), None),
            ),
            AppError::Query { report, source } => {
                tracing::error!(report = %report, error = %source, "Database query error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::failure("Internal Server Error", Some(source.to_string())),
                )
            }
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("done", vec![1, 2]);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["message"], "done");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("details").is_none());
    }

    #[test]
    fn api_response_failure_has_no_data() {
        let response = ApiResponse::<()>::failure("Internal Server Error", Some("boom".into()));
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["details"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn api_response_decodes_missing_data() {
        let parsed: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"error":true,"message":"x"}"#).unwrap();
        assert!(parsed.error);
        assert!(parsed.data.is_none());
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("/nope".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: /nope");
    }

    #[test]
    fn query_error_display_names_report() {
        let err = AppError::query("yearly-projects", sqlx::Error::RowNotFound);
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("Query failed for yearly-projects"));
    }

    #[test]
    fn query_error_maps_to_500() {
        let response = AppError::query("status", sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
