//! Logout endpoint handler.
//!
//! Revokes the refresh token's jti best-effort and always clears both
//! cookies. The endpoint never fails: a missing, malformed, expired, or
//! already-revoked token and an unreachable revocation store all
//! produce the same success response, because the user-visible effect
//! ("no longer logged in") already holds.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};

use crate::middleware::{AuthState, extract_cookie_value};

/// Handler for `POST /logout`.
///
/// Always 205 with `Set-Cookie` headers deleting both cookies.
pub async fn logout_handler(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let refresh_token = extract_cookie_value(&headers, &state.cookies.refresh_cookie);
    let revoked = state.sessions.logout(refresh_token.as_deref()).await;

    tracing::info!(revoked, "User logged out");

    let mut response = StatusCode::RESET_CONTENT.into_response();
    for name in [&state.cookies.access_cookie, &state.cookies.refresh_cookie] {
        let clear = state.cookies.build_clear_cookie(name);
        if let Ok(value) = HeaderValue::from_str(&clear) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}
