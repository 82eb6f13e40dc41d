//! Authentication configuration.
//!
//! Token lifetimes, rotation policy, and cookie transport settings.
//! Cookie domain and the `Secure` flag are deployment configuration, not
//! constants: they differ between local development and any real
//! environment.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! access_token_lifetime = "60m"
//! refresh_token_lifetime = "10d"
//! rotate_refresh_tokens = false
//!
//! [auth.cookie]
//! domain = "example.com"
//! secure = true
//! ```

use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

/// Errors produced while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is invalid or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token lifetime.
    /// Access tokens are not individually revocable, so this stays short.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime. Must exceed the access token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Rotate refresh tokens on use.
    /// When enabled, each refresh revokes the presented token and issues
    /// a new one, so a replayed refresh token is rejected.
    pub rotate_refresh_tokens: bool,

    /// Cookie transport settings.
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::from_secs(60 * 60), // 60 minutes
            refresh_token_lifetime: Duration::from_secs(10 * 24 * 3600), // 10 days
            rotate_refresh_tokens: false,
            cookie: CookieConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if lifetimes are zero or mis-ordered, or cookie
    /// names are empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_lifetime.is_zero() {
            return Err(ConfigError::Invalid(
                "auth.access_token_lifetime must be > 0".into(),
            ));
        }
        if self.refresh_token_lifetime <= self.access_token_lifetime {
            return Err(ConfigError::Invalid(
                "auth.refresh_token_lifetime must exceed auth.access_token_lifetime".into(),
            ));
        }
        if self.cookie.access_cookie.is_empty() || self.cookie.refresh_cookie.is_empty() {
            return Err(ConfigError::Invalid(
                "auth.cookie names must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Access token lifetime as a [`time::Duration`].
    #[must_use]
    pub fn access_lifetime(&self) -> time::Duration {
        time::Duration::seconds(self.access_token_lifetime.as_secs() as i64)
    }

    /// Refresh token lifetime as a [`time::Duration`].
    #[must_use]
    pub fn refresh_lifetime(&self) -> time::Duration {
        time::Duration::seconds(self.refresh_token_lifetime.as_secs() as i64)
    }
}

/// Cookie transport configuration.
///
/// Cookies are always `HttpOnly` with `SameSite=Lax`: readable across
/// subdomains of the configured domain, never sent cross-site, never
/// visible to page scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Name of the access token cookie.
    pub access_cookie: String,

    /// Name of the refresh token cookie.
    pub refresh_cookie: String,

    /// Cookie domain. `None` scopes cookies to the serving host.
    pub domain: Option<String>,

    /// Cookie path.
    pub path: String,

    /// Whether to set the `Secure` flag. Environment-dependent: off for
    /// plain-HTTP local development, on everywhere else.
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_cookie: "access_token".to_string(),
            refresh_cookie: "refresh_token".to_string(),
            domain: None,
            path: "/".to_string(),
            secure: false,
        }
    }
}

impl CookieConfig {
    /// Builds a `Set-Cookie` value carrying a token, expiring together
    /// with the token itself.
    #[must_use]
    pub fn build_token_cookie(
        &self,
        name: &str,
        value: &str,
        expires_at: OffsetDateTime,
    ) -> String {
        let mut builder = Cookie::build((name.to_string(), value.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path(self.path.clone())
            .expires(expires_at);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build().to_string()
    }

    /// Builds a `Set-Cookie` value instructing the client to delete a
    /// cookie immediately.
    #[must_use]
    pub fn build_clear_cookie(&self, name: &str) -> String {
        let mut builder = Cookie::build((name.to_string(), String::new()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path(self.path.clone())
            .max_age(time::Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_lifetime, Duration::from_secs(3600));
        assert_eq!(
            config.refresh_token_lifetime,
            Duration::from_secs(10 * 24 * 3600)
        );
        assert!(!config.rotate_refresh_tokens);
        assert_eq!(config.cookie.access_cookie, "access_token");
        assert_eq!(config.cookie.refresh_cookie, "refresh_token");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_misordered_lifetimes() {
        let config = AuthConfig {
            access_token_lifetime: Duration::from_secs(3600),
            refresh_token_lifetime: Duration::from_secs(60),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_access_lifetime() {
        let config = AuthConfig {
            access_token_lifetime: Duration::ZERO,
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_humantime_deserialization() {
        let config: AuthConfig = toml_like_json(r#"{
            "access_token_lifetime": "60m",
            "refresh_token_lifetime": "10d"
        }"#);
        assert_eq!(config.access_token_lifetime, Duration::from_secs(3600));
        assert_eq!(
            config.refresh_token_lifetime,
            Duration::from_secs(10 * 24 * 3600)
        );
    }

    fn toml_like_json(json: &str) -> AuthConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_token_cookie_attributes() {
        let config = CookieConfig {
            domain: Some("example.com".to_string()),
            secure: true,
            ..CookieConfig::default()
        };
        let expires = OffsetDateTime::now_utc() + time::Duration::hours(1);
        let header = config.build_token_cookie("access_token", "tok", expires);

        assert!(header.starts_with("access_token=tok"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Secure"));
        assert!(header.contains("Domain=example.com"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Expires="));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let config = CookieConfig::default();
        let header = config.build_clear_cookie("refresh_token");

        assert!(header.starts_with("refresh_token="));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("HttpOnly"));
        assert!(!header.contains("Secure"));
    }
}
