//! HTTP handlers for the session endpoints.
//!
//! # Available Handlers
//!
//! - [`login`] - credential verification and token pair delivery
//! - [`refresh`] - access token renewal from the refresh cookie
//! - [`logout`] - best-effort revocation and cookie clearing
//! - [`profile`] - the protected identity summary endpoint

pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;

pub use login::{LoginRequest, LoginResponse, login_handler};
pub use logout::logout_handler;
pub use profile::{ProfileResponse, profile_handler};
pub use refresh::{RefreshResponse, refresh_handler};

use axum::http::{HeaderValue, header::SET_COOKIE};
use axum::response::Response;

use crate::error::{AuthError, AuthResult};

/// Appends a `Set-Cookie` header to a response.
///
/// Uses append, not insert: login and refresh deliver more than one
/// cookie on a single response.
pub(crate) fn append_set_cookie(response: &mut Response, value: &str) -> AuthResult<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| AuthError::internal(format!("Invalid Set-Cookie value: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
