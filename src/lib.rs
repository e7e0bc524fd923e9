//! Locker - a minimal authenticated file locker.
//!
//! A single configured user logs in through a browser and can list, upload,
//! download and delete files kept in one storage directory.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use auth::{CredentialStore, Session, SessionManager};
pub use config::Config;
pub use error::{LockerError, Result};
pub use storage::{StorageGateway, StoredFile};
pub use web::WebServer;
