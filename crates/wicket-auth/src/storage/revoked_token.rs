//! Revoked refresh token storage trait.
//!
//! This module defines the storage interface for tracking revoked refresh
//! token JTIs. When a refresh token is revoked, its JTI is stored until
//! the token would have naturally expired, allowing the refresh path to
//! check for revocation.
//!
//! Access tokens are not tracked here: they are not individually
//! revocable and expire passively, which keeps the revocation store
//! off the hot path of protected requests.
//!
//! # Security Considerations
//!
//! - Revoked JTIs must be stored with their original expiration time
//! - Entries may be dropped once that time has passed without
//!   correctness loss
//! - If the store is unreachable, callers must fail closed: treat the
//!   token as revoked rather than accept a credential that may already
//!   have been blacklisted

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::AuthResult;

/// Storage trait for revoked refresh token JTIs.
///
/// Implementations must be safe for concurrent use and must provide the
/// per-key atomicity [`revoke_if_active`](Self::revoke_if_active)
/// requires; no other coordination is expected from callers.
#[async_trait]
pub trait RevokedTokenStorage: Send + Sync {
    /// Marks a refresh token JTI as revoked.
    ///
    /// The `expires_at` parameter should be the token's original
    /// expiration time, allowing cleanup of the record once it is no
    /// longer needed.
    ///
    /// # Idempotency
    ///
    /// Revoking an already-revoked JTI succeeds without error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke(&self, jti: &str, expires_at: OffsetDateTime) -> AuthResult<()>;

    /// Atomically transitions a JTI from active to revoked.
    ///
    /// Returns `true` if this call performed the transition and `false`
    /// if the JTI was already revoked. Of any number of concurrent
    /// callers passing the same JTI, exactly one observes `true`; this
    /// is what makes rotate-on-use safe against parallel refresh
    /// requests replaying one token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke_if_active(&self, jti: &str, expires_at: OffsetDateTime) -> AuthResult<bool>;

    /// Checks if a refresh token JTI has been revoked.
    ///
    /// Returns `true` until the recorded `expires_at` elapses; after
    /// that the token is rejected by expiry anyway and the record may be
    /// gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails. Callers on the
    /// refresh path must treat that error as "revoked".
    async fn is_revoked(&self, jti: &str) -> AuthResult<bool>;

    /// Deletes revocation records whose tokens have naturally expired.
    ///
    /// Returns the number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
