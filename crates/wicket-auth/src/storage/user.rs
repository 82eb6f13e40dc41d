//! Identity store trait.
//!
//! The identity store is an external collaborator: Wicket only reads
//! identities through this narrow interface and never writes them. User
//! registration, profile editing, and the persistence engine behind the
//! store are out of scope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthResult;

/// An identity as seen by the token lifecycle core.
///
/// Owned by the external identity store; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique identifier. This is the value carried as the token
    /// `sub` claim.
    pub id: Uuid,

    /// Display/login name, unique within the store.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Whether the account may authenticate at all.
    pub active: bool,

    /// Elevated/staff flag.
    pub staff: bool,

    /// Superuser flag.
    pub superuser: bool,
}

impl Identity {
    /// The derived role name exposed to clients.
    #[must_use]
    pub fn role(&self) -> &'static str {
        if self.staff { "admin" } else { "user" }
    }
}

/// Read-only interface into the external identity store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Verifies a username/password pair.
    ///
    /// Returns the identity on success and `None` on any mismatch;
    /// implementations must not reveal whether the username or the
    /// password was wrong.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<Identity>>;

    /// Looks up an identity by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>>;

    /// Looks up an identity by id.
    ///
    /// Called on every protected request to derive role flags fresh, so
    /// implementations should keep this lookup cheap.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Identity>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_derivation() {
        let mut identity = Identity {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            active: true,
            staff: false,
            superuser: false,
        };
        assert_eq!(identity.role(), "user");

        identity.staff = true;
        assert_eq!(identity.role(), "admin");
    }
}
