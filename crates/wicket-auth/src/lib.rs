//! # wicket-auth
//!
//! Session credential lifecycle for the Wicket server.
//!
//! This crate provides:
//! - Signed token generation and validation over a shared secret
//! - Access/refresh pair issuance with configurable lifetimes
//! - Refresh token revocation (blacklisting) with atomic rotate-on-use
//! - The login / refresh / logout session protocol
//! - Cookie transport: HTTP-only delivery and the cookie-to-bearer
//!   request bridge
//!
//! ## Overview
//!
//! Login verifies credentials against an external identity store and
//! delivers an access/refresh token pair as cookies. Protected requests
//! are verified purely (signature, expiry, kind) plus a fresh identity
//! lookup; the refresh exchange additionally consults the revocation
//! store, which fails closed. Logout blacklists the refresh token
//! best-effort and always clears both cookies.
//!
//! ## Modules
//!
//! - [`config`] - lifetimes, rotation policy, cookie settings
//! - [`token`] - signing, verification, and issuance
//! - [`session`] - the login / refresh / logout state machine
//! - [`storage`] - revocation store and identity store traits + in-memory backends
//! - [`middleware`] - Axum extractor and error responses
//! - [`http`] - Axum handlers for the session endpoints
//! - [`password`] - Argon2 helpers for the in-memory identity backend

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod password;
pub mod session;
pub mod storage;
pub mod token;

pub use config::{AuthConfig, ConfigError, CookieConfig};
pub use error::{AuthError, AuthResult};
pub use http::{
    LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, login_handler, logout_handler,
    profile_handler, refresh_handler,
};
pub use middleware::{AuthContext, AuthState, CookieAuth};
pub use session::{RefreshGrant, SessionService};
pub use storage::{
    Identity, IdentityStore, InMemoryIdentityStore, InMemoryRevokedTokenStorage,
    RevokedTokenStorage,
};
pub use token::{Claims, IssuedToken, JwtError, JwtSigner, TokenIssuer, TokenKind, TokenPair};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use wicket_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AuthConfig, ConfigError, CookieConfig};
    pub use crate::error::{AuthError, AuthResult};
    pub use crate::http::{
        LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, login_handler,
        logout_handler, profile_handler, refresh_handler,
    };
    pub use crate::middleware::{AuthContext, AuthState, CookieAuth};
    pub use crate::session::{RefreshGrant, SessionService};
    pub use crate::storage::{
        Identity, IdentityStore, InMemoryIdentityStore, InMemoryRevokedTokenStorage,
        RevokedTokenStorage,
    };
    pub use crate::token::{
        Claims, IssuedToken, JwtError, JwtSigner, TokenIssuer, TokenKind, TokenPair,
    };
}
