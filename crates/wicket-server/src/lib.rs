//! HTTP server for Wicket cookie-based session credentials.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use wicket_auth::error::{AuthError, AuthResult};
use wicket_auth::http::{login_handler, logout_handler, profile_handler, refresh_handler};
use wicket_auth::middleware::AuthState;
use wicket_auth::session::SessionService;
use wicket_auth::storage::memory::{InMemoryIdentityStore, InMemoryRevokedTokenStorage};
use wicket_auth::token::issuer::TokenIssuer;
use wicket_auth::token::jwt::JwtSigner;

pub mod bootstrap;
pub mod config;
pub mod observability;

use config::AppConfig;

/// Builds the application state from configuration.
///
/// Returns the state and a handle to the revocation store for the
/// background cleanup task.
///
/// # Errors
/// Returns an error if auth settings are inconsistent or seeding fails.
pub fn build_state(
    config: &AppConfig,
    secret: &str,
) -> AuthResult<(AuthState, Arc<InMemoryRevokedTokenStorage>)> {
    if secret.is_empty() {
        return Err(AuthError::configuration("signing secret must not be empty"));
    }

    let signer = Arc::new(JwtSigner::new(secret.as_bytes()));
    let issuer = TokenIssuer::new(
        signer.clone(),
        config.auth.access_lifetime(),
        config.auth.refresh_lifetime(),
    )?;

    let identities = Arc::new(InMemoryIdentityStore::new());
    bootstrap::seed_identities(&identities, &config.users)?;

    let revoked_tokens = Arc::new(InMemoryRevokedTokenStorage::new());

    let sessions = Arc::new(SessionService::new(
        signer,
        issuer,
        revoked_tokens.clone(),
        identities,
        config.auth.rotate_refresh_tokens,
    ));

    let state = AuthState::new(sessions, config.auth.cookie.clone());
    Ok((state, revoked_tokens))
}

/// Assembles the application router.
pub fn build_router(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/token/refresh", post(refresh_handler))
        .route("/logout", post(logout_handler))
        .route("/profile", get(profile_handler))
        .route("/healthz", get(healthz_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz_handler() -> &'static str {
    "ok"
}

/// Periodically drops revocation records for naturally expired tokens.
///
/// Runs until the process exits; failures are logged and retried on the
/// next tick.
pub async fn run_revocation_gc(
    store: Arc<InMemoryRevokedTokenStorage>,
    interval: std::time::Duration,
) {
    use wicket_auth::storage::revoked_token::RevokedTokenStorage;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match store.cleanup_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Dropped expired revocation records"),
            Err(e) => tracing::warn!(error = %e, "Revocation store cleanup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedUser;

    #[test]
    fn test_build_state_rejects_empty_secret() {
        let config = AppConfig::default();
        assert!(build_state(&config, "").is_err());
    }

    #[test]
    fn test_build_state_with_seed_users() {
        let config = AppConfig {
            users: vec![SeedUser {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
                email: "alice@example.com".to_string(),
                staff: false,
                superuser: false,
                active: true,
            }],
            ..AppConfig::default()
        };

        let (state, revoked) = build_state(&config, "unit-test-secret").unwrap();
        assert!(!state.sessions.rotates_refresh_tokens());
        assert!(revoked.is_empty());
    }
}
