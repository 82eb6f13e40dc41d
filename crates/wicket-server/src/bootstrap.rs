//! Startup seeding of the identity store.

use tracing::info;
use uuid::Uuid;
use wicket_auth::error::{AuthError, AuthResult};
use wicket_auth::password::hash_password;
use wicket_auth::storage::memory::InMemoryIdentityStore;
use wicket_auth::storage::user::Identity;

use crate::config::SeedUser;

/// Hashes seed passwords and inserts the configured identities.
///
/// Returns the number of identities seeded.
///
/// # Errors
/// Returns an error if password hashing or the store insert fails.
pub fn seed_identities(
    store: &InMemoryIdentityStore,
    users: &[SeedUser],
) -> AuthResult<usize> {
    for user in users {
        let password_hash = hash_password(&user.password)
            .map_err(|e| AuthError::internal(format!("Failed to hash seed password: {e}")))?;
        store.insert(
            Identity {
                id: Uuid::new_v4(),
                username: user.username.clone(),
                email: user.email.clone(),
                active: user.active,
                staff: user.staff,
                superuser: user.superuser,
            },
            password_hash,
        )?;
    }

    info!(count = users.len(), "Identity store seeded");
    Ok(users.len())
}
