//! Signed token generation and validation.
//!
//! This module provides the tamper-evident credential layer for Wicket.
//! Tokens are JWTs signed with HS256 over a deployment-wide shared
//! secret; verification is a pure function of the token string, the
//! secret, and the clock.
//!
//! ## Example
//!
//! ```ignore
//! use wicket_auth::token::jwt::{Claims, JwtSigner, TokenKind};
//!
//! let signer = JwtSigner::new(secret.as_bytes());
//! let token = signer.sign(&claims)?;
//! let claims = signer.verify(&token, TokenKind::Access)?;
//! ```

use std::fmt;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during token signing and verification.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The token structure could not be parsed.
    #[error("Malformed token")]
    Malformed,

    /// The token signature does not match.
    #[error("Bad signature")]
    BadSignature,

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token is of a different kind than expected.
    #[error("Wrong token kind: expected {expected}, found {found}")]
    WrongKind {
        /// The kind the caller expected.
        expected: TokenKind,
        /// The kind carried by the token.
        found: TokenKind,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },
}

impl JwtError {
    /// Returns `true` if this is a validation error (as opposed to an
    /// encoding failure).
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::Encoding { .. })
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Malformed,
        }
    }
}

// ============================================================================
// Token Kind
// ============================================================================

/// The two kinds of credential Wicket issues.
///
/// The kind is embedded in the signed claims, so a refresh token can
/// never be replayed where an access token is expected and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing individual protected requests.
    Access,
    /// Long-lived credential exchanged for new access tokens.
    Refresh,
}

impl TokenKind {
    /// Returns the kind name as carried in the `kind` claim.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Claims
// ============================================================================

/// The signed claim set of a Wicket credential.
///
/// Role flags are not part of the claim set: authorization state is
/// re-queried from the identity store at verification time, so it can
/// never go stale for the lifetime of a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (identity id).
    pub sub: Uuid,

    /// Which kind of credential this is.
    pub kind: TokenKind,

    /// Unique identifier of this issued token, used as the revocation key.
    pub jti: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp). Always strictly after `iat`.
    pub exp: i64,
}

impl Claims {
    /// Expiration as an [`time::OffsetDateTime`].
    ///
    /// # Errors
    /// Returns an error if the `exp` claim is outside the representable range.
    pub fn expires_at(&self) -> Result<time::OffsetDateTime, time::error::ComponentRange> {
        time::OffsetDateTime::from_unix_timestamp(self.exp)
    }
}

// ============================================================================
// Signer
// ============================================================================

/// Signs and verifies Wicket credentials over a shared secret.
///
/// The secret is injected at construction and only retained in derived
/// key form; it is never read from ambient process state, logged, or
/// exposed. The signer holds no mutable state and is safe to share
/// across any number of concurrent callers.
///
/// HMAC comparison during verification is constant-time (delegated to
/// the underlying MAC implementation), and the signature is checked
/// before the payload is parsed, so any claim mutation surfaces as
/// [`JwtError::BadSignature`].
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSigner {
    /// Creates a new signer from the shared secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // A token one second past its expiry must fail verification.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encodes claims into a signed token string.
    ///
    /// # Errors
    /// Returns [`JwtError::Encoding`] if serialization fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            JwtError::Encoding {
                message: e.to_string(),
            }
        })
    }

    /// Decodes and validates a token string, requiring it to be of the
    /// expected kind.
    ///
    /// # Errors
    /// Returns [`JwtError::Malformed`], [`JwtError::BadSignature`],
    /// [`JwtError::Expired`], or [`JwtError::WrongKind`].
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.kind != expected {
            return Err(JwtError::WrongKind {
                expected,
                found: claims.kind,
            });
        }

        Ok(claims)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn test_signer() -> JwtSigner {
        JwtSigner::new(b"test-secret-at-least-somewhat-long")
    }

    fn test_claims(kind: TokenKind, lifetime_secs: i64) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            sub: Uuid::new_v4(),
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + lifetime_secs,
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let signer = test_signer();
        let claims = test_claims(TokenKind::Access, 3600);

        let token = signer.sign(&claims).unwrap();
        assert!(!token.is_empty());

        let verified = signer.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_payload_mutation_invalidates_signature() {
        let signer = test_signer();
        let claims = test_claims(TokenKind::Access, 3600);
        let token = signer.sign(&claims).unwrap();

        // Flip one character inside the payload segment.
        let mut parts: Vec<String> = token.split('.').map(ToString::to_string).collect();
        assert_eq!(parts.len(), 3);
        let payload = &mut parts[1];
        let replacement = if payload.starts_with('A') { "B" } else { "A" };
        payload.replace_range(0..1, replacement);
        let tampered = parts.join(".");

        let result = signer.verify(&tampered, TokenKind::Access);
        assert!(matches!(result, Err(JwtError::BadSignature)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let signer = test_signer();
        let other = JwtSigner::new(b"a-completely-different-secret");
        let claims = test_claims(TokenKind::Access, 3600);

        let token = other.sign(&claims).unwrap();
        let result = signer.verify(&token, TokenKind::Access);
        assert!(matches!(result, Err(JwtError::BadSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = test_signer();
        // Expired one second ago; zero leeway means this must fail.
        let claims = test_claims(TokenKind::Access, -1);

        let token = signer.sign(&claims).unwrap();
        let result = signer.verify(&token, TokenKind::Access);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let signer = test_signer();
        let claims = test_claims(TokenKind::Refresh, 3600);

        let token = signer.sign(&claims).unwrap();
        let result = signer.verify(&token, TokenKind::Access);
        match result {
            Err(JwtError::WrongKind { expected, found }) => {
                assert_eq!(expected, TokenKind::Access);
                assert_eq!(found, TokenKind::Refresh);
            }
            other => panic!("expected WrongKind, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let signer = test_signer();
        let result = signer.verify("not-a-token", TokenKind::Access);
        assert!(matches!(result, Err(JwtError::Malformed)));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let signer = test_signer();
        // Syntactically valid JWT shape, but no usable signature.
        let header = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let payload = "eyJzdWIiOiJ4In0";
        let result = signer.verify(&format!("{header}.{payload}."), TokenKind::Access);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
        assert_eq!(TokenKind::Access.to_string(), "access");
        assert_eq!(TokenKind::Refresh.to_string(), "refresh");
    }

    #[test]
    fn test_error_predicates() {
        assert!(JwtError::Expired.is_validation_error());
        assert!(JwtError::BadSignature.is_validation_error());
        assert!(
            !JwtError::Encoding {
                message: "x".into()
            }
            .is_validation_error()
        );
    }
}
