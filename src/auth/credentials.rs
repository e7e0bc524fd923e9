//! The single-user credential store.

use tracing::info;

use super::password::{check_hash_format, hash_password, verify_password};
use crate::config::AuthConfig;
use crate::{LockerError, Result};

/// Holds the one configured username and its password hash.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    username: String,
    password_hash: String,
}

impl CredentialStore {
    /// Create a store from a username and an Argon2 PHC hash.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Result<Self> {
        let password_hash = password_hash.into();
        check_hash_format(&password_hash)
            .map_err(|e| LockerError::Config(format!("auth.password_hash: {e}")))?;

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// Create a store by hashing a plaintext password.
    pub fn from_password(username: impl Into<String>, password: &str) -> Result<Self> {
        let password_hash = hash_password(password)
            .map_err(|e| LockerError::Config(format!("auth.password: {e}")))?;

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// Build the store from configuration, preferring the configured hash.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        if !config.password_hash.is_empty() {
            return Self::new(&config.username, &config.password_hash);
        }
        info!("No password hash configured; hashing bootstrap password");
        Self::from_password(&config.username, &config.password)
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a username/password pair.
    ///
    /// True only when the username matches exactly (case-sensitive) and the
    /// password verifies against the stored hash. The hash is checked even
    /// when the username is wrong so both failures cost the same.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let password_ok = verify_password(password, &self.password_hash).is_ok();
        let username_ok = username == self.username;
        username_ok && password_ok
    }
}
