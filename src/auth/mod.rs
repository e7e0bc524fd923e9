//! Authentication module for the locker.
//!
//! This module provides password hashing, the single-user credential
//! store and signed session tokens.

mod credentials;
mod password;
mod session;

pub use credentials::CredentialStore;
pub use password::{check_hash_format, hash_password, verify_password, PasswordError};
pub use session::{
    Session, SessionClaims, SessionError, SessionManager, DEFAULT_SESSION_DURATION_SECS,
    MAX_SESSION_DURATION_SECS,
};
