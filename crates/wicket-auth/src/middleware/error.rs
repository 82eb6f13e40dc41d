//! Error response handling for the HTTP surface.
//!
//! This module implements `IntoResponse` for `AuthError` so handlers
//! and extractors can bubble errors straight to the client as a uniform
//! `{"detail": "..."}` body.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, detail) = error_details(&self);

        let body = json!({ "detail": detail });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(&detail);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Extracts the HTTP status and client-facing detail for an error.
///
/// Storage failures map to 401 with a generic detail: the store fails
/// closed, and the client must not be able to distinguish infra failure
/// from an invalid credential. Internal failures map to 500 with a
/// generic detail; messages never carry secret material.
fn error_details(error: &AuthError) -> (StatusCode, String) {
    match error {
        AuthError::AuthenticationFailed => (
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ),
        AuthError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        AuthError::RefreshRejected { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        AuthError::Storage { .. } => (
            StatusCode::UNAUTHORIZED,
            "Invalid access credential".to_string(),
        ),
        AuthError::Configuration { .. } | AuthError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

/// Builds the WWW-Authenticate header value for 401 responses.
fn build_www_authenticate_header(description: &str) -> String {
    let escaped = description.replace('\"', "\\\"");
    format!("Bearer realm=\"wicket\", error_description=\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_authentication_failed_response() {
        let response = AuthError::AuthenticationFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Invalid username or password");
    }

    #[tokio::test]
    async fn test_refresh_rejected_carries_detail() {
        let response = AuthError::refresh_rejected("Refresh token missing in cookies")
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Refresh token missing in cookies");
    }

    #[tokio::test]
    async fn test_storage_error_is_indistinguishable_from_rejection() {
        let response = AuthError::storage("pg: connection refused").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // The backend detail must never reach the client.
        assert_eq!(json["detail"], "Invalid access credential");
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let response = AuthError::internal("secret=abc leaked?").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Internal server error");
    }

    #[test]
    fn test_www_authenticate_escaping() {
        let header = build_www_authenticate_header("contains \"quotes\"");
        assert!(header.contains("\\\"quotes\\\""));
        assert!(header.starts_with("Bearer realm=\"wicket\""));
    }
}
