//! Session management for the locker.
//!
//! A session token is an HS256-signed JWT carrying the username and an
//! `authenticated` flag. Tokens need no server-side storage to validate;
//! the only shared state is a small revocation list so that a destroyed
//! token stays dead even if the client replays it.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthConfig;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

/// Longest session lifetime accepted (one year).
pub const MAX_SESSION_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token could not be signed.
    #[error("failed to sign session token: {0}")]
    Signing(String),
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (username).
    pub sub: String,
    /// Whether the holder has logged in.
    pub authenticated: bool,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// Token ID (unique identifier).
    pub jti: String,
}

/// A validated, authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Username the session was created for.
    pub username: String,
    /// Always true for sessions returned by [`SessionManager::validate`].
    pub authenticated: bool,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

/// Issues, validates and destroys session tokens.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Session lifetime in seconds.
    duration_secs: u64,
    /// Destroyed token IDs, mapped to their expiry timestamp.
    revoked: RwLock<HashMap<String, u64>>,
}

fn now() -> u64 {
    Utc::now().timestamp() as u64
}

impl SessionManager {
    /// Create a session manager signing with `secret`.
    ///
    /// `duration_secs` is capped at [`MAX_SESSION_DURATION_SECS`].
    pub fn new(secret: &str, duration_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            duration_secs: duration_secs.min(MAX_SESSION_DURATION_SECS),
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session manager from configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.session_secret, config.session_expiry_secs)
    }

    /// Session lifetime in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Issue a new authenticated session token for `username`.
    pub fn create(&self, username: &str) -> Result<String, SessionError> {
        let now = now();
        let claims = SessionClaims {
            sub: username.to_string(),
            authenticated: true,
            iat: now,
            exp: now.saturating_add(self.duration_secs),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))?;

        info!(username = %username, "Session created");
        Ok(token)
    }

    /// Validate a token and return its session.
    ///
    /// Returns `None` when the token is malformed, has a bad signature, has
    /// expired, is not marked authenticated, or was destroyed.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let claims = self.decode(token)?;

        if !claims.authenticated {
            debug!("Session token not marked authenticated");
            return None;
        }
        if self.is_revoked(&claims.jti) {
            debug!("Session token was revoked");
            return None;
        }

        Some(Session {
            username: claims.sub,
            authenticated: true,
            expires_at: DateTime::from_timestamp(claims.exp as i64, 0)?,
        })
    }

    /// Destroy the session behind `token`.
    ///
    /// Idempotent: unknown, invalid, expired or already destroyed tokens are
    /// ignored.
    pub fn destroy(&self, token: &str) {
        let Some(claims) = self.decode(token) else {
            return;
        };

        let mut revoked = self.revoked.write().unwrap_or_else(|e| e.into_inner());
        let now = now();
        revoked.retain(|_, exp| *exp >= now);
        if revoked.insert(claims.jti, claims.exp).is_none() {
            info!(username = %claims.sub, "Session destroyed");
        }
    }

    /// Number of destroyed tokens that have not yet expired.
    pub fn revoked_count(&self) -> usize {
        let now = now();
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|exp| **exp >= now)
            .count()
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| debug!("Session token rejected: {}", e))
            .ok()
    }

    fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(jti)
    }
}
