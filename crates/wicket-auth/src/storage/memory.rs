//! In-memory storage backends.
//!
//! These back the storage traits with process-local maps. They are the
//! default wiring for tests and single-node deployments; a durable
//! backend can replace them behind the same traits without touching the
//! session protocol.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::password::verify_password;
use crate::storage::revoked_token::RevokedTokenStorage;
use crate::storage::user::{Identity, IdentityStore};

// =============================================================================
// Revoked Token Storage
// =============================================================================

/// In-memory revocation store keyed by JTI.
///
/// Per-key atomicity comes from the map's entry API: the check and the
/// insert in [`revoke_if_active`](RevokedTokenStorage::revoke_if_active)
/// happen under the entry lock, so two concurrent refreshes racing on
/// one JTI observe exactly one winner.
#[derive(Default)]
pub struct InMemoryRevokedTokenStorage {
    entries: DashMap<String, OffsetDateTime>,
}

impl InMemoryRevokedTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live revocation records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no revocation records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RevokedTokenStorage for InMemoryRevokedTokenStorage {
    async fn revoke(&self, jti: &str, expires_at: OffsetDateTime) -> AuthResult<()> {
        self.entries.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn revoke_if_active(&self, jti: &str, expires_at: OffsetDateTime) -> AuthResult<bool> {
        let now = OffsetDateTime::now_utc();
        match self.entries.entry(jti.to_string()) {
            Entry::Occupied(mut occupied) => {
                if *occupied.get() <= now {
                    // Stale record for a token that has expired anyway.
                    occupied.insert(expires_at);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(expires_at);
                Ok(true)
            }
        }
    }

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let now = OffsetDateTime::now_utc();
        // Drop a stale record on read; the token it guarded has expired.
        let _ = self.entries.remove_if(jti, |_, expires_at| *expires_at <= now);
        Ok(self.entries.contains_key(jti))
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        Ok((before - self.entries.len()) as u64)
    }
}

// =============================================================================
// Identity Store
// =============================================================================

struct StoredIdentity {
    identity: Identity,
    password_hash: String,
}

/// In-memory identity store with Argon2-hashed passwords.
///
/// Populated once at startup (or per test); reads dominate afterwards.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    identities: RwLock<HashMap<Uuid, StoredIdentity>>,
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an identity with its pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert(&self, identity: Identity, password_hash: String) -> AuthResult<()> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| AuthError::storage("identity store lock poisoned"))?;
        identities.insert(
            identity.id,
            StoredIdentity {
                identity,
                password_hash,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<Identity>> {
        let identities = self
            .identities
            .read()
            .map_err(|_| AuthError::storage("identity store lock poisoned"))?;

        let Some(stored) = identities
            .values()
            .find(|s| s.identity.username == username)
        else {
            return Ok(None);
        };

        if !stored.identity.active {
            return Ok(None);
        }

        match verify_password(password, &stored.password_hash) {
            Ok(true) => Ok(Some(stored.identity.clone())),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::warn!(username, error = %e, "Unparseable password hash in identity store");
                Ok(None)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>> {
        let identities = self
            .identities
            .read()
            .map_err(|_| AuthError::storage("identity store lock poisoned"))?;
        Ok(identities
            .values()
            .find(|s| s.identity.username == username)
            .map(|s| s.identity.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Identity>> {
        let identities = self
            .identities
            .read()
            .map_err(|_| AuthError::storage("identity store lock poisoned"))?;
        Ok(identities.get(&id).map(|s| s.identity.clone()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use time::Duration;

    fn soon() -> OffsetDateTime {
        OffsetDateTime::now_utc() + Duration::hours(1)
    }

    #[tokio::test]
    async fn test_revoke_and_is_revoked() {
        let store = InMemoryRevokedTokenStorage::new();
        assert!(!store.is_revoked("jti-1").await.unwrap());

        store.revoke("jti-1", soon()).await.unwrap();
        assert!(store.is_revoked("jti-1").await.unwrap());
        assert!(!store.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = InMemoryRevokedTokenStorage::new();
        store.revoke("jti-1", soon()).await.unwrap();
        store.revoke("jti-1", soon()).await.unwrap();
        assert!(store.is_revoked("jti-1").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_if_active_single_winner() {
        let store = InMemoryRevokedTokenStorage::new();

        assert!(store.revoke_if_active("jti-1", soon()).await.unwrap());
        assert!(!store.revoke_if_active("jti-1", soon()).await.unwrap());
        assert!(store.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_revoke_if_active() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryRevokedTokenStorage::new());
        let expires = soon();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.revoke_if_active("contested", expires).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_expired_record_is_not_revoked() {
        let store = InMemoryRevokedTokenStorage::new();
        let past = OffsetDateTime::now_utc() - Duration::seconds(1);

        store.revoke("jti-old", past).await.unwrap();
        assert!(!store.is_revoked("jti-old").await.unwrap());
        // The stale record is dropped on read.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_expired_drops_only_expired() {
        let store = InMemoryRevokedTokenStorage::new();
        let past = OffsetDateTime::now_utc() - Duration::seconds(1);

        store.revoke("stale", past).await.unwrap();
        store.revoke("live", soon()).await.unwrap();

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.is_revoked("live").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    fn seeded_store() -> (InMemoryIdentityStore, Identity) {
        let store = InMemoryIdentityStore::new();
        let identity = Identity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            active: true,
            staff: true,
            superuser: false,
        };
        store
            .insert(identity.clone(), hash_password("s3cret").unwrap())
            .unwrap();
        (store, identity)
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let (store, identity) = seeded_store();

        let found = store.verify_credentials("alice", "s3cret").await.unwrap();
        assert_eq!(found.unwrap().id, identity.id);

        assert!(
            store
                .verify_credentials("alice", "wrong")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .verify_credentials("nobody", "s3cret")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_inactive_identity_never_verifies() {
        let store = InMemoryIdentityStore::new();
        let identity = Identity {
            id: Uuid::new_v4(),
            username: "mallory".to_string(),
            email: "mallory@example.com".to_string(),
            active: false,
            staff: false,
            superuser: false,
        };
        store
            .insert(identity, hash_password("pw").unwrap())
            .unwrap();

        assert!(
            store
                .verify_credentials("mallory", "pw")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_lookups() {
        let (store, identity) = seeded_store();

        let by_name = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, identity.id);

        let by_id = store.find_by_id(identity.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(store.find_by_username("bob").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
