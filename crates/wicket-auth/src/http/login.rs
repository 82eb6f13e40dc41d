//! Login endpoint handler.
//!
//! Verifies credentials against the identity store and delivers a fresh
//! access/refresh pair as HTTP-only cookies. The response body carries
//! only the identity summary; tokens travel in cookies.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::middleware::AuthState;
use crate::storage::user::Identity;

use super::append_set_cookie;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username to authenticate as.
    pub username: String,
    /// Plaintext password, verified against the identity store.
    pub password: String,
}

/// Identity summary returned on successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Identity id.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Derived role name.
    pub role: &'static str,
}

impl From<&Identity> for LoginResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role(),
        }
    }
}

/// Handler for `POST /login`.
///
/// On success: 200 with the identity summary and `Set-Cookie` headers
/// for both tokens, each expiring together with its token. On failure:
/// 401 with a generic detail that does not reveal whether the username
/// or the password was wrong.
pub async fn login_handler(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let (identity, pair) = state
        .sessions
        .login(&request.username, &request.password)
        .await?;

    tracing::info!(subject = %identity.id, "User logged in");

    let mut response =
        (StatusCode::OK, Json(LoginResponse::from(&identity))).into_response();

    let access_cookie = state.cookies.build_token_cookie(
        &state.cookies.access_cookie,
        &pair.access.token,
        pair.access.expires_at(),
    );
    let refresh_cookie = state.cookies.build_token_cookie(
        &state.cookies.refresh_cookie,
        &pair.refresh.token,
        pair.refresh.expires_at(),
    );
    append_set_cookie(&mut response, &access_cookie)?;
    append_set_cookie(&mut response, &refresh_cookie)?;

    Ok(response)
}
