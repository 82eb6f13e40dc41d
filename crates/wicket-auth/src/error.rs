//! Authentication error types.
//!
//! This module defines all error types that can occur during credential
//! issuance, verification, refresh, and revocation.

/// Errors that can occur during session credential operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied login credentials could not be verified.
    ///
    /// Deliberately carries no detail: the caller must not be able to
    /// tell whether the username or the password was wrong.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The request lacks a valid access credential.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The refresh credential is missing, invalid, expired, or revoked.
    #[error("Refresh rejected: {message}")]
    RefreshRejected {
        /// Description of why the refresh was rejected.
        message: String,
    },

    /// An error occurred while storing or retrieving auth data.
    ///
    /// On the verify and refresh paths this is converted to
    /// [`AuthError::Unauthorized`] / [`AuthError::RefreshRejected`]
    /// before reaching the client: the store failing closed must be
    /// indistinguishable from an invalid credential.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `RefreshRejected` error.
    #[must_use]
    pub fn refresh_rejected(message: impl Into<String>) -> Self {
        Self::RefreshRejected {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed
                | Self::Unauthorized { .. }
                | Self::RefreshRejected { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    ///
    /// `Storage` is intentionally absent from both predicates: it is
    /// surfaced to clients as a credential rejection (fail closed), not
    /// as an infrastructure failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Internal { .. })
    }

    /// Converts a storage-layer failure into the fail-closed rejection
    /// appropriate for the refresh path.
    ///
    /// Non-storage errors pass through unchanged.
    #[must_use]
    pub fn fail_closed_refresh(self) -> Self {
        match self {
            Self::Storage { message } => {
                tracing::warn!(error = %message, "Revocation store unavailable, failing closed");
                Self::refresh_rejected("Refresh token rejected")
            }
            other => other,
        }
    }

    /// Converts a storage-layer failure into the fail-closed rejection
    /// appropriate for the access-verification path.
    #[must_use]
    pub fn fail_closed_unauthorized(self) -> Self {
        match self {
            Self::Storage { message } => {
                tracing::warn!(error = %message, "Identity store unavailable, failing closed");
                Self::unauthorized("Invalid access credential")
            }
            other => other,
        }
    }
}

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::AuthenticationFailed.to_string(),
            "Authentication failed"
        );
        assert_eq!(
            AuthError::unauthorized("missing cookie").to_string(),
            "Unauthorized: missing cookie"
        );
        assert_eq!(
            AuthError::refresh_rejected("token revoked").to_string(),
            "Refresh rejected: token revoked"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::AuthenticationFailed.is_client_error());
        assert!(AuthError::unauthorized("x").is_client_error());
        assert!(AuthError::refresh_rejected("x").is_client_error());
        assert!(!AuthError::storage("down").is_client_error());
        assert!(!AuthError::storage("down").is_server_error());
        assert!(AuthError::internal("boom").is_server_error());
        assert!(AuthError::configuration("bad").is_server_error());
    }

    #[test]
    fn test_fail_closed_refresh_masks_storage() {
        let err = AuthError::storage("connection refused").fail_closed_refresh();
        assert!(matches!(err, AuthError::RefreshRejected { .. }));
        // The storage detail must not leak into the client-facing message.
        assert!(!err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_fail_closed_unauthorized_masks_storage() {
        let err = AuthError::storage("timeout").fail_closed_unauthorized();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
        assert!(!err.to_string().contains("timeout"));
    }

    #[test]
    fn test_fail_closed_passes_through_other_errors() {
        let err = AuthError::refresh_rejected("already revoked").fail_closed_refresh();
        assert_eq!(err.to_string(), "Refresh rejected: already revoked");
    }
}
