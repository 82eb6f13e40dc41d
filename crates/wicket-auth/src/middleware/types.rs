//! Authenticated request context types.

use std::sync::Arc;

use uuid::Uuid;

use crate::storage::user::Identity;
use crate::token::jwt::Claims;

/// Authenticated request context.
///
/// Extracted from requests by the [`CookieAuth`](super::CookieAuth)
/// extractor. Claims are wrapped in `Arc` for cheap cloning across
/// async boundaries; the identity was loaded fresh from the identity
/// store during extraction, so its role flags are current.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated access token claims.
    pub claims: Arc<Claims>,

    /// The identity behind the token.
    pub identity: Identity,
}

impl AuthContext {
    /// The subject identifier from the token.
    #[must_use]
    pub fn subject(&self) -> Uuid {
        self.claims.sub
    }

    /// The unique identifier of the presented token.
    #[must_use]
    pub fn jti(&self) -> &str {
        &self.claims.jti
    }

    /// The identity's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.identity.username
    }

    /// The derived role name.
    #[must_use]
    pub fn role(&self) -> &'static str {
        self.identity.role()
    }

    /// Whether the identity carries the staff flag.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.identity.staff
    }

    /// Whether the identity carries the superuser flag.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.identity.superuser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::jwt::TokenKind;

    #[test]
    fn test_accessors() {
        let id = Uuid::new_v4();
        let context = AuthContext {
            claims: Arc::new(Claims {
                sub: id,
                kind: TokenKind::Access,
                jti: "jti-1".to_string(),
                iat: 0,
                exp: 60,
            }),
            identity: Identity {
                id,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                active: true,
                staff: true,
                superuser: false,
            },
        };

        assert_eq!(context.subject(), id);
        assert_eq!(context.jti(), "jti-1");
        assert_eq!(context.username(), "alice");
        assert_eq!(context.role(), "admin");
        assert!(context.is_staff());
        assert!(!context.is_superuser());
    }
}
