//! Translation of failures into HTTP responses.
//!
//! Every error a handler or extractor can produce becomes an [`ApiError`].
//! Its `IntoResponse` decides status and message; [`render_error_body`]
//! then adds the request path and timestamp, which a handler's error value
//! does not know.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::services::ServiceError;
use crate::validation::FieldViolation;

pub const MALFORMED_REQUEST: &str = "Invalid request format. Please ensure the request body is valid JSON and data types are correct.";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const UNEXPECTED: &str = "An unexpected error occurred";

/// Any failure surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Body that could not be read as the expected JSON shape.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    /// Path segment that could not be parsed as an id.
    #[error("{0}")]
    InvalidPath(String),
}

/// Status and payload of an error, before request context is attached.
#[derive(Debug, Clone)]
pub struct ErrorBody {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldViolation>>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    /// Final response, stamped with the path that failed.
    pub fn render(self, path: impl Into<String>) -> Response {
        let status = self.status;
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.message,
            path: path.into(),
            timestamp: Utc::now(),
            errors: self.errors,
        };
        (status, Json(body)).into_response()
    }
}

/// Error payload as sent to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ApiError {
    /// The single place where error kinds map to status codes.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Service(ServiceError::NotFound { .. }) => {
                ErrorBody::new(StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Service(ServiceError::BusinessRule(message)) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Service(ServiceError::Validation(violations)) => ErrorBody {
                errors: Some(violations.clone()),
                ..ErrorBody::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED)
            },
            ApiError::Service(e @ (ServiceError::Storage(_) | ServiceError::Unexpected(_))) => {
                error!(error = %e, "request failed");
                ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED)
            }
            ApiError::MalformedRequest(detail) => {
                debug!(detail = %detail, "malformed request body");
                ErrorBody::new(StatusCode::BAD_REQUEST, MALFORMED_REQUEST)
            }
            ApiError::InvalidPath(detail) => {
                warn!(detail = %detail, "invalid path parameter");
                ErrorBody::new(StatusCode::BAD_REQUEST, detail.clone())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        let mut response = body.status.into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Middleware that renders any [`ErrorBody`] left on a response.
pub async fn render_error_body(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<ErrorBody>() {
        Some(body) => body.render(path),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::storage::StorageError;

    async fn rendered(error: ApiError) -> (StatusCode, Value) {
        let body = error.body();
        let response = body.render("/api/test");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, json) = rendered(ServiceError::not_found("Order", 5).into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], 404);
        assert_eq!(json["message"], "Order not found with id: '5'");
        assert_eq!(json["path"], "/api/test");
        assert!(json["timestamp"].is_string());
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_business_rule() {
        let err = ServiceError::BusinessRule("Order must contain at least one item".to_string());
        let (status, json) = rendered(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Order must contain at least one item");
    }

    #[tokio::test]
    async fn test_validation_lists_fields() {
        let err = ServiceError::Validation(vec![FieldViolation::new("price", "Price is required")]);
        let (status, json) = rendered(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], VALIDATION_FAILED);
        assert_eq!(json["errors"][0]["field"], "price");
        assert_eq!(json["errors"][0]["message"], "Price is required");
    }

    #[tokio::test]
    async fn test_malformed_request_hides_detail() {
        let (status, json) =
            rendered(ApiError::MalformedRequest("expected value at line 1".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], MALFORMED_REQUEST);
    }

    #[tokio::test]
    async fn test_storage_error_is_generic() {
        let err = ServiceError::Storage(StorageError::Corrupt {
            table: "products",
            column: "price",
            reason: "bad decimal".to_string(),
        });
        let (status, json) = rendered(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], UNEXPECTED);
        assert!(!json.to_string().contains("bad decimal"));
    }

    #[test]
    fn test_into_response_defers_body() {
        let response = ApiError::from(ServiceError::not_found("Product", 1)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorBody>().is_some());
    }
}
