//! Error types for the live API server.
//!
//! [`ApiError`] unifies all request failures into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! variant is a client error; a panicking handler is turned into a `500`
//! by the router's `CatchPanicLayer`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cleantrack_core::query::ReportError;
use tracing::warn;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or query string was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A report failed validation.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let message = match self {
            Self::InvalidRequest(msg) => msg,
            Self::Report(e) => e.to_string(),
        };

        warn!(status = status.as_u16(), error = %message, "request rejected");

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_request_maps_to_bad_request() {
        let response = ApiError::InvalidRequest(String::from("lat is required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["error"], "lat is required");
    }

    #[tokio::test]
    async fn report_error_maps_to_bad_request() {
        let error = ReportError::NonFinite { field: "lng" };
        let expected = error.to_string();
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], expected);
    }
}
