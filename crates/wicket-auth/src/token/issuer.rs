//! Token issuance.
//!
//! This module builds access and refresh claim sets from an identity and
//! applies the configured lifetimes. Every issued token gets a fresh
//! random `jti`, which is the key the revocation store operates on.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::storage::user::Identity;
use crate::token::jwt::{Claims, JwtSigner, TokenKind};

/// A freshly issued credential together with its claim set.
///
/// The claims are kept alongside the encoded string so the transport
/// layer can align cookie expiry with the token's own `exp` without
/// re-parsing it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,
    /// The claims the string encodes.
    pub claims: Claims,
}

impl IssuedToken {
    /// Expiration of this token.
    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        // exp was computed from an OffsetDateTime moments ago; it is in range.
        OffsetDateTime::from_unix_timestamp(self.claims.exp)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// An access/refresh pair delivered together at login.
///
/// The pair is linked only by sharing the same subject; no session
/// object is stored server-side.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived credential for protected requests.
    pub access: IssuedToken,
    /// Long-lived credential for the refresh exchange.
    pub refresh: IssuedToken,
}

/// Builds and signs token claim sets.
///
/// Pure value factory: no storage access, no shared mutable state.
pub struct TokenIssuer {
    signer: Arc<JwtSigner>,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    /// Creates a new issuer.
    ///
    /// # Errors
    /// Returns a configuration error unless
    /// `refresh_lifetime > access_lifetime` and both are positive.
    pub fn new(
        signer: Arc<JwtSigner>,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> AuthResult<Self> {
        if !access_lifetime.is_positive() {
            return Err(AuthError::configuration(
                "access token lifetime must be positive",
            ));
        }
        if refresh_lifetime <= access_lifetime {
            return Err(AuthError::configuration(
                "refresh token lifetime must exceed access token lifetime",
            ));
        }

        Ok(Self {
            signer,
            access_lifetime,
            refresh_lifetime,
        })
    }

    /// Issues an access/refresh pair for an identity.
    ///
    /// # Errors
    /// Returns an error if token encoding fails.
    pub fn issue_pair(&self, identity: &Identity) -> AuthResult<TokenPair> {
        let access = self.issue_access(identity.id)?;
        let refresh = self.issue_refresh(identity.id)?;
        Ok(TokenPair { access, refresh })
    }

    /// Issues a single access token for a subject.
    ///
    /// # Errors
    /// Returns an error if token encoding fails.
    pub fn issue_access(&self, subject: Uuid) -> AuthResult<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        self.issue(subject, TokenKind::Access, now, now + self.access_lifetime)
    }

    /// Issues a refresh token with the full configured lifetime.
    ///
    /// # Errors
    /// Returns an error if token encoding fails.
    pub fn issue_refresh(&self, subject: Uuid) -> AuthResult<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        self.issue(subject, TokenKind::Refresh, now, now + self.refresh_lifetime)
    }

    /// Issues a replacement refresh token that inherits an existing
    /// expiry.
    ///
    /// Used by rotate-on-use: the replacement carries a fresh `jti` but
    /// keeps the original token's expiration, so rotation never extends
    /// a session.
    ///
    /// # Errors
    /// Returns an error if token encoding fails.
    pub fn issue_refresh_until(
        &self,
        subject: Uuid,
        expires_at: OffsetDateTime,
    ) -> AuthResult<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        self.issue(subject, TokenKind::Refresh, now, expires_at)
    }

    fn issue(
        &self,
        subject: Uuid,
        kind: TokenKind,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> AuthResult<IssuedToken> {
        let claims = Claims {
            sub: subject,
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = self
            .signer
            .sign(&claims)
            .map_err(|e| AuthError::internal(format!("Failed to encode token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }

    /// The configured access token lifetime.
    #[must_use]
    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    /// The configured refresh token lifetime.
    #[must_use]
    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }
}
