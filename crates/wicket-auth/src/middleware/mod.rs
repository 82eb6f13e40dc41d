//! HTTP middleware for authentication.
//!
//! This module provides Axum middleware for:
//!
//! - Access credential extraction from cookie or bearer header
//! - Request authentication
//! - Uniform `{"detail": ...}` error responses
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
//! let auth_state = AuthState::new(sessions, cookie_config);
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{AuthState, CookieAuth};
pub use types::AuthContext;

pub(crate) use auth::{extract_bearer_token, extract_cookie_value};
