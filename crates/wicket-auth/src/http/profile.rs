//! Protected profile endpoint handler.

use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::CookieAuth;

/// Identity summary returned by the profile endpoint.
///
/// The role is derived from the identity store at request time, not
/// from the token, so flag changes take effect immediately.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Identity id.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Derived role name.
    pub role: &'static str,
}

/// Handler for `GET /profile`.
pub async fn profile_handler(CookieAuth(auth): CookieAuth) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: auth.identity.id,
        username: auth.identity.username.clone(),
        email: auth.identity.email.clone(),
        role: auth.role(),
    })
}
