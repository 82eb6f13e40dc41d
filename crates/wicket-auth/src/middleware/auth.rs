//! Cookie-to-bearer authentication extractor.
//!
//! This is the request-scoped bridge between cookie transport and the
//! generic verification layer: the access token arrives in a cookie (or
//! an `Authorization: Bearer` header, which always wins when present)
//! and leaves this module as a verified [`AuthContext`].
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use wicket_auth::middleware::{AuthState, CookieAuth};
//!
//! async fn protected_handler(CookieAuth(auth): CookieAuth) -> String {
//!     format!("Hello, {}!", auth.username())
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, header::COOKIE, request::Parts},
};

use crate::config::CookieConfig;
use crate::error::AuthError;
use crate::session::SessionService;

use super::types::AuthContext;

// =============================================================================
// Auth State
// =============================================================================

/// State required by the extractor and the session endpoints.
///
/// Include this in your application state and expose it to the
/// extractor via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// The session protocol service.
    pub sessions: Arc<SessionService>,

    /// Cookie transport configuration.
    pub cookies: CookieConfig,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(sessions: Arc<SessionService>, cookies: CookieConfig) -> Self {
        Self { sessions, cookies }
    }
}

// =============================================================================
// Cookie Auth Extractor
// =============================================================================

/// Axum extractor that validates the access credential on a request.
///
/// This extractor:
/// 1. Reads the `Authorization: Bearer <token>` header, falling back to
///    the configured access cookie
/// 2. Verifies signature, expiry, and token kind
/// 3. Re-queries the identity store for the subject
///
/// No revocation lookup happens here: access tokens expire passively.
///
/// # Errors
///
/// Returns [`AuthError`] (which implements `IntoResponse`) if no
/// credential is present or verification fails.
pub struct CookieAuth(pub AuthContext);

impl<S> FromRequestParts<S> for CookieAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = extract_bearer_token(&parts.headers)
            .or_else(|| {
                extract_cookie_value(&parts.headers, &auth_state.cookies.access_cookie)
            })
            .ok_or_else(|| AuthError::unauthorized("Missing access credential"))?;

        let (claims, identity) = auth_state.sessions.authenticate(&token).await?;

        tracing::debug!(
            subject = %claims.sub,
            jti = %claims.jti,
            "Access credential validated"
        );

        Ok(CookieAuth(AuthContext {
            claims: Arc::new(claims),
            identity,
        }))
    }
}

// =============================================================================
// Header Helpers
// =============================================================================

/// Extract a Bearer token from the Authorization header.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

/// Extract a named cookie value from the Cookie header.
///
/// Parses the `key=value; key=value` format directly; absence is not an
/// error at this layer.
pub(crate) fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name.trim() == cookie_name
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

// =============================================================================
// Tests
// =============================================================================
