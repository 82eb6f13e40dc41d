//! Token refresh endpoint handler.
//!
//! Reads the refresh cookie (no request body) and exchanges it for a
//! renewed access token. When rotate-on-use is enabled the response
//! also carries a replacement refresh cookie.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AuthError;
use crate::middleware::{AuthState, extract_cookie_value};

use super::append_set_cookie;

/// Response body for a successful refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// The renewed access token. Also delivered as a cookie; the body
    /// copy mirrors what the cookie carries.
    pub access_token: String,
}

/// Handler for `POST /token/refresh`.
///
/// Missing and invalid/expired/revoked refresh tokens both produce 401;
/// only the detail message differs, so the status code leaks nothing
/// about which check failed.
pub async fn refresh_handler(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let token = extract_cookie_value(&headers, &state.cookies.refresh_cookie)
        .ok_or_else(|| AuthError::refresh_rejected("Refresh token missing in cookies"))?;

    let grant = state.sessions.refresh(&token).await?;

    tracing::debug!(subject = %grant.access.claims.sub, "Access token refreshed");

    let mut response = (
        StatusCode::OK,
        Json(RefreshResponse {
            access_token: grant.access.token.clone(),
        }),
    )
        .into_response();

    let access_cookie = state.cookies.build_token_cookie(
        &state.cookies.access_cookie,
        &grant.access.token,
        grant.access.expires_at(),
    );
    append_set_cookie(&mut response, &access_cookie)?;

    if let Some(rotated) = &grant.refresh {
        let refresh_cookie = state.cookies.build_token_cookie(
            &state.cookies.refresh_cookie,
            &rotated.token,
            rotated.expires_at(),
        );
        append_set_cookie(&mut response, &refresh_cookie)?;
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{login_cookies, test_auth_state};
    use axum::http::HeaderValue;
    use axum::http::header::{COOKIE, SET_COOKIE};

    #[tokio::test]
    async fn test_refresh_missing_cookie_rejected() {
        let state = test_auth_state(false).await;

        let result = refresh_handler(State(state), HeaderMap::new()).await;
        match result {
            Err(AuthError::RefreshRejected { message }) => {
                assert!(message.contains("missing"));
            }
            other => panic!("expected RefreshRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_sets_renewed_access_cookie() {
        let state = test_auth_state(false).await;
        let (_, refresh_cookie) = login_cookies(&state).await;

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("refresh_token={refresh_cookie}")).unwrap(),
        );

        let response = refresh_handler(State(state), headers).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        // Default policy: access cookie only, no rotated refresh cookie.
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].to_str().unwrap().starts_with("access_token="));
    }

    #[tokio::test]
    async fn test_refresh_with_rotation_sets_both_cookies() {
        let state = test_auth_state(true).await;
        let (_, refresh_cookie) = login_cookies(&state).await;

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("refresh_token={refresh_cookie}")).unwrap(),
        );

        let response = refresh_handler(State(state), headers).await.unwrap();
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
    }
}
