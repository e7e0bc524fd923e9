//! Configuration module for the locker.

use serde::Deserialize;
use std::path::Path;

use crate::auth::MAX_SESSION_DURATION_SECS;
use crate::{LockerError, Result};

/// Minimum length of the session signing secret in bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Credential and session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// The single user allowed to log in.
    #[serde(default = "default_username")]
    pub username: String,
    /// Argon2 PHC hash of the user's password.
    #[serde(default)]
    pub password_hash: String,
    /// Plaintext bootstrap password, hashed once at startup.
    ///
    /// Only consulted when `password_hash` is empty.
    #[serde(default)]
    pub password: String,
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub session_secret: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: u64,
    /// Mark the session cookie `Secure` (enable behind HTTPS).
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_session_expiry() -> u64 {
    86400 // 24 hours
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password_hash: String::new(),
            password: String::new(),
            session_secret: String::new(),
            session_expiry_secs: default_session_expiry(),
            secure_cookie: false,
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the storage root directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    100
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl StorageConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Web front-end configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Rate limit for login attempts (requests per minute per client IP).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Key the login limit on `X-Forwarded-For`/`X-Real-IP`. Only enable
    /// behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_login_rate_limit() -> u32 {
    10
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            login_rate_limit: default_login_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/locker.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential and session configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web front-end configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LockerError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LockerError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `LOCKER_USERNAME`
    /// - `LOCKER_PASSWORD_HASH`
    /// - `LOCKER_PASSWORD`
    /// - `LOCKER_SESSION_SECRET`
    /// - `LOCKER_STORAGE_PATH`
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 5] = [
            ("LOCKER_USERNAME", &mut self.auth.username),
            ("LOCKER_PASSWORD_HASH", &mut self.auth.password_hash),
            ("LOCKER_PASSWORD", &mut self.auth.password),
            ("LOCKER_SESSION_SECRET", &mut self.auth.session_secret),
            ("LOCKER_STORAGE_PATH", &mut self.storage.path),
        ];

        for (var, target) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the username is empty
    /// - neither a password hash nor a bootstrap password is set
    /// - the session secret is missing or shorter than 32 bytes
    /// - the session expiry is zero or longer than one year
    pub fn validate(&self) -> Result<()> {
        if self.auth.username.is_empty() {
            return Err(LockerError::Config("auth.username must not be empty".to_string()));
        }
        if self.auth.password_hash.is_empty() && self.auth.password.is_empty() {
            return Err(LockerError::Config(
                "No credentials configured. Set auth.password_hash in config.toml \
                 or via LOCKER_PASSWORD_HASH environment variable."
                    .to_string(),
            ));
        }
        if self.auth.session_secret.is_empty() {
            return Err(LockerError::Config(
                "session_secret is not set. \
                 Set it in config.toml or via LOCKER_SESSION_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(LockerError::Config(format!(
                "session_secret must be at least {MIN_SESSION_SECRET_LENGTH} bytes"
            )));
        }
        if !(1..=MAX_SESSION_DURATION_SECS).contains(&self.auth.session_expiry_secs) {
            return Err(LockerError::Config(format!(
                "session_expiry_secs must be between 1 and {MAX_SESSION_DURATION_SECS}"
            )));
        }
        Ok(())
    }
}
