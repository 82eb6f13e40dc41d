//! The session protocol: login, refresh, logout, and request
//! verification.
//!
//! This is the state machine orchestrating the signer, the token
//! issuer, the revocation store, and the external identity store. Per
//! refresh token the states are `Active -> Revoked` (terminal); access
//! tokens have no explicit state beyond passive expiry.
//!
//! The service is stateless per request. The revocation store is the
//! only shared mutable resource it touches, and every path that
//! consults it fails closed: a storage error is reported to the caller
//! as a credential rejection, never as acceptance.

use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::storage::revoked_token::RevokedTokenStorage;
use crate::storage::user::{Identity, IdentityStore};
use crate::token::issuer::{IssuedToken, TokenIssuer, TokenPair};
use crate::token::jwt::{Claims, JwtError, JwtSigner, TokenKind};

/// The result of a successful refresh exchange.
#[derive(Debug, Clone)]
pub struct RefreshGrant {
    /// The renewed access token.
    pub access: IssuedToken,

    /// A replacement refresh token, present only when rotate-on-use is
    /// enabled. Under the default policy the client keeps using the
    /// refresh token it presented.
    pub refresh: Option<IssuedToken>,
}

/// Orchestrates the credential lifecycle.
pub struct SessionService {
    signer: Arc<JwtSigner>,
    issuer: TokenIssuer,
    revoked_tokens: Arc<dyn RevokedTokenStorage>,
    identities: Arc<dyn IdentityStore>,
    rotate_refresh_tokens: bool,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        signer: Arc<JwtSigner>,
        issuer: TokenIssuer,
        revoked_tokens: Arc<dyn RevokedTokenStorage>,
        identities: Arc<dyn IdentityStore>,
        rotate_refresh_tokens: bool,
    ) -> Self {
        Self {
            signer,
            issuer,
            revoked_tokens,
            identities,
            rotate_refresh_tokens,
        }
    }

    /// Verifies credentials against the identity store and issues a
    /// fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] on unknown username,
    /// wrong password, an inactive account, or an unreachable identity
    /// store. The error is identical in every case.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<(Identity, TokenPair)> {
        let identity = self
            .identities
            .verify_credentials(username, password)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity store unavailable during login");
                AuthError::AuthenticationFailed
            })?
            .ok_or(AuthError::AuthenticationFailed)?;

        if !identity.active {
            return Err(AuthError::AuthenticationFailed);
        }

        let pair = self.issuer.issue_pair(&identity)?;
        tracing::debug!(subject = %identity.id, "Login succeeded, token pair issued");
        Ok((identity, pair))
    }

    /// Exchanges a live refresh token for a new access token.
    ///
    /// Under the default policy the refresh token itself is not
    /// rotated. With rotate-on-use enabled, the presented token's jti
    /// is atomically revoked before a replacement is issued; of two
    /// concurrent refreshes racing on the same token exactly one
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RefreshRejected`] if the token is invalid,
    /// expired, of the wrong kind, revoked, lost a rotation race, or
    /// the revocation store is unreachable (fail closed).
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshGrant> {
        let claims = self
            .signer
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|e| AuthError::refresh_rejected(refresh_reject_message(&e)))?;

        let revoked = self
            .revoked_tokens
            .is_revoked(&claims.jti)
            .await
            .map_err(AuthError::fail_closed_refresh)?;
        if revoked {
            tracing::debug!(jti = %claims.jti, "Refresh rejected: token revoked");
            return Err(AuthError::refresh_rejected("Refresh token has been revoked"));
        }

        if !self.rotate_refresh_tokens {
            let access = self.issuer.issue_access(claims.sub)?;
            tracing::debug!(subject = %claims.sub, "Access token reissued");
            return Ok(RefreshGrant {
                access,
                refresh: None,
            });
        }

        // Rotate-on-use: the old jti must transition to revoked before
        // the replacement exists, and only the caller that performed
        // the transition gets one.
        let expires_at = claims
            .expires_at()
            .map_err(|_| AuthError::refresh_rejected("Invalid refresh token"))?;
        let transitioned = self
            .revoked_tokens
            .revoke_if_active(&claims.jti, expires_at)
            .await
            .map_err(AuthError::fail_closed_refresh)?;
        if !transitioned {
            tracing::debug!(jti = %claims.jti, "Refresh rejected: lost rotation race");
            return Err(AuthError::refresh_rejected("Refresh token has been revoked"));
        }

        let access = self.issuer.issue_access(claims.sub)?;
        let refresh = self.issuer.issue_refresh_until(claims.sub, expires_at)?;
        tracing::debug!(subject = %claims.sub, "Refresh token rotated");
        Ok(RefreshGrant {
            access,
            refresh: Some(refresh),
        })
    }

    /// Revokes the presented refresh token, best-effort.
    ///
    /// Never fails: a missing, malformed, or already-expired token and
    /// an unreachable revocation store are all treated as "nothing to
    /// do", because the user-visible effect of logout (cookies cleared,
    /// no longer logged in) holds regardless. Returns whether a
    /// revocation was actually recorded, for logging.
    pub async fn logout(&self, refresh_token: Option<&str>) -> bool {
        let Some(token) = refresh_token else {
            tracing::debug!("Logout without refresh cookie, nothing to revoke");
            return false;
        };

        let claims = match self.signer.verify(token, TokenKind::Refresh) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable refresh token during logout");
                return false;
            }
        };

        let Ok(expires_at) = claims.expires_at() else {
            return false;
        };

        match self.revoked_tokens.revoke(&claims.jti, expires_at).await {
            Ok(()) => {
                tracing::debug!(jti = %claims.jti, "Refresh token revoked during logout");
                true
            }
            Err(e) => {
                // Best-effort: surface for operators, not to the client.
                tracing::warn!(error = %e, "Failed to record revocation during logout");
                false
            }
        }
    }

    /// Verifies an access token and loads the identity behind it.
    ///
    /// This is a pure verifier check: access tokens are not
    /// individually revocable, their blast radius is bounded by the
    /// short lifetime, and keeping the revocation store off this path
    /// keeps protected requests storage-free. Role flags come from the
    /// fresh identity lookup, not from the token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the token is invalid,
    /// expired, of the wrong kind, or the identity is gone, inactive,
    /// or unreachable (fail closed).
    pub async fn authenticate(&self, access_token: &str) -> AuthResult<(Claims, Identity)> {
        let claims = self
            .signer
            .verify(access_token, TokenKind::Access)
            .map_err(|e| AuthError::unauthorized(access_reject_message(&e)))?;

        let identity = self
            .identities
            .find_by_id(claims.sub)
            .await
            .map_err(AuthError::fail_closed_unauthorized)?
            .ok_or_else(|| AuthError::unauthorized("Invalid access credential"))?;

        if !identity.active {
            tracing::debug!(subject = %claims.sub, "Rejecting token for inactive identity");
            return Err(AuthError::unauthorized("Invalid access credential"));
        }

        Ok((claims, identity))
    }

    /// Whether rotate-on-use is enabled.
    #[must_use]
    pub fn rotates_refresh_tokens(&self) -> bool {
        self.rotate_refresh_tokens
    }
}

/// Client-facing rejection message for a refresh verification failure.
fn refresh_reject_message(error: &JwtError) -> &'static str {
    match error {
        JwtError::Expired => "Refresh token has expired",
        _ => "Invalid refresh token",
    }
}

/// Client-facing rejection message for an access verification failure.
fn access_reject_message(error: &JwtError) -> &'static str {
    match error {
        JwtError::Expired => "Access token has expired",
        _ => "Invalid access credential",
    }
}

// =============================================================================
// Tests
// =============================================================================
