//! File storage for the locker.
//!
//! A single flat directory holds every stored file. All access goes through
//! [`StorageGateway`], which sanitizes names before touching the filesystem.

mod gateway;
mod name;

pub use gateway::{StorageGateway, StoredFile};
pub use name::{sanitize_name, NameError, MAX_NAME_LENGTH};
