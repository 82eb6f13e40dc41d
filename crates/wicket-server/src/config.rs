//! Server configuration.
//!
//! Loaded from a TOML file (`wicket.toml` by default) with the signing
//! secret taken from the `WICKET_SECRET` environment variable. The
//! secret has no TOML representation: config files get committed,
//! secrets must not.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wicket_auth::config::AuthConfig;

/// Environment variable holding the shared signing secret.
pub const SECRET_ENV_VAR: &str = "WICKET_SECRET";

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value is invalid or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The signing secret is not set.
    #[error("{SECRET_ENV_VAR} must be set to a non-empty signing secret")]
    MissingSecret,
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Authentication configuration.
    pub auth: AuthConfig,

    /// Identities seeded into the in-memory identity store at startup.
    pub users: Vec<SeedUser>,
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error for a zero port, inconsistent auth settings, or
    /// unusable seed users.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".into()));
        }
        self.auth
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        for user in &self.users {
            if user.username.is_empty() || user.password.is_empty() {
                return Err(ConfigError::Invalid(
                    "seed users must have a username and password".into(),
                ));
            }
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// An identity to seed into the in-memory identity store.
///
/// Seed passwords arrive in plaintext from deployment config and are
/// hashed before they reach the store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedUser {
    /// Username.
    pub username: String,
    /// Plaintext password, hashed at startup.
    pub password: String,
    /// Email address.
    pub email: String,
    /// Staff flag.
    #[serde(default)]
    pub staff: bool,
    /// Superuser flag.
    #[serde(default)]
    pub superuser: bool,
    /// Whether the account may authenticate. Defaults to active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Loads configuration from the given path, or `wicket.toml` when no
/// path is given. A missing default file yields the built-in defaults.
///
/// # Errors
/// Returns an error if an explicitly named file cannot be read, or the
/// file fails to parse or validate.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(p) => parse_file(p)?,
        None => {
            let default_path = Path::new("wicket.toml");
            if default_path.exists() {
                parse_file(default_path)?
            } else {
                AppConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

/// Reads the signing secret from the environment.
///
/// # Errors
/// Returns [`ConfigError::MissingSecret`] when unset or empty.
pub fn load_secret() -> Result<String, ConfigError> {
    std::env::var(SECRET_ENV_VAR)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingSecret)
}
