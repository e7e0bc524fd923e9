//! Storage gateway: the only code that touches the storage root.
//!
//! Files live directly under the root, keyed by their sanitized name:
//! ```text
//! {root}/
//! ├── report.txt
//! ├── photo.jpg
//! └── ...
//! ```
//! There is no index or cache; every listing reads the directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::name::{sanitize_name, NameError};
use crate::{LockerError, Result};

/// A file written to the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Sanitized name, unique within the root.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Gateway mediating every list/save/fetch/delete on the storage root.
///
/// Concurrent `save` calls on the same name are last-writer-wins and a
/// `delete` racing a `fetch` may surface as `NotFound`; no locking is done.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    /// Canonical storage root.
    root: PathBuf,
}

impl StorageGateway {
    /// Open the gateway on `root`, creating the directory if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;

        Ok(Self { root })
    }

    /// Get the canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the names of all stored files, sorted lexically by byte order.
    ///
    /// Only regular files are listed. Entries whose names are not valid
    /// UTF-8, or that would not sanitize to themselves (such as a name
    /// containing `\`), are skipped so every listed name can be fetched
    /// and deleted as shown.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if sanitize_name(&name).is_ok_and(|s| s == name) => names.push(name),
                Ok(name) => {
                    debug!(name = %name.escape_debug(), "Skipping unaddressable file name")
                }
                Err(raw) => debug!(name = ?raw, "Skipping non UTF-8 file name"),
            }
        }

        names.sort();
        Ok(names)
    }

    /// Write `content` under `name`, silently replacing any existing file.
    pub fn save(&self, name: &str, content: &[u8]) -> Result<StoredFile> {
        let (name, path) = self.resolve(name)?;

        fs::write(&path, content)?;

        Ok(StoredFile {
            name,
            size: content.len() as u64,
        })
    }

    /// Read the full content of `name`.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let (name, path) = self.resolve(name)?;
        Self::ensure_file(&name, &path)?;

        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LockerError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove `name` from storage.
    ///
    /// Deleting a name that is not present fails with `NotFound`, including a
    /// second delete of the same name.
    pub fn delete(&self, name: &str) -> Result<()> {
        let (name, path) = self.resolve(name)?;
        Self::ensure_file(&name, &path)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LockerError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sanitize `raw` and resolve it to a path directly under the root.
    ///
    /// The join is checked, not assumed: an existing entry is canonicalized
    /// (following symlinks) and must still have the root as its parent.
    fn resolve(&self, raw: &str) -> Result<(String, PathBuf)> {
        let name = sanitize_name(raw).map_err(|e| {
            warn!(name = %raw.escape_debug(), reason = %e, "Rejected file name");
            e
        })?;
        let candidate = self.root.join(&name);

        let resolved = match candidate.canonicalize() {
            Ok(resolved) => resolved,
            // A dangling symlink would let a write land wherever it points
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if fs::symlink_metadata(&candidate).is_ok() {
                    warn!(name = %name, "Rejected dangling symlink in storage root");
                    return Err(NameError::OutsideRoot.into());
                }
                candidate.clone()
            }
            Err(e) => return Err(e.into()),
        };

        if resolved.parent() != Some(self.root.as_path()) {
            warn!(name = %name, "Rejected file name resolving outside storage root");
            return Err(NameError::OutsideRoot.into());
        }

        Ok((name, candidate))
    }

    /// Anything that is not a regular file counts as absent.
    fn ensure_file(name: &str, path: &Path) -> Result<()> {
        match fs::metadata(path) {
            Ok(m) if m.is_file() => Ok(()),
            Ok(_) => Err(LockerError::NotFound(format!("File: {name}"))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LockerError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, StorageGateway) {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageGateway::new(temp_dir.path().join("uploads")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("nested").join("uploads");

        assert!(!storage_path.exists());

        let storage = StorageGateway::new(&storage_path).unwrap();

        assert!(storage_path.is_dir());
        assert_eq!(storage.root(), storage_path.canonicalize().unwrap());
    }

    #[test]
    fn test_list_empty() {
        let (_temp_dir, storage) = setup_storage();
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_files_only() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("b.txt", b"b").unwrap();
        storage.save("a.txt", b"a").unwrap();
        storage.save("C.txt", b"c").unwrap();
        fs::create_dir(storage.root().join("subdir")).unwrap();

        assert_eq!(storage.list().unwrap(), vec!["C.txt", "a.txt", "b.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_skips_names_that_resolve_elsewhere() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("b.txt", b"precious").unwrap();
        fs::write(storage.root().join("old\\b.txt"), b"junk").unwrap();

        assert_eq!(storage.list().unwrap(), vec!["b.txt"]);

        // Every listed name round-trips to its own content
        for name in storage.list().unwrap() {
            storage.fetch(&name).unwrap();
        }
        assert_eq!(storage.fetch("b.txt").unwrap(), b"precious");
    }

    #[test]
    fn test_list_reflects_external_changes() {
        let (_temp_dir, storage) = setup_storage();

        fs::write(storage.root().join("outside-write.txt"), b"x").unwrap();
        assert_eq!(storage.list().unwrap(), vec!["outside-write.txt"]);

        fs::remove_file(storage.root().join("outside-write.txt")).unwrap();
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_fetch() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage.save("hello.txt", b"Hello, World!").unwrap();
        assert_eq!(stored.name, "hello.txt");
        assert_eq!(stored.size, 13);

        assert_eq!(storage.fetch("hello.txt").unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_empty_and_binary_content() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("empty", b"").unwrap();
        assert!(storage.fetch("empty").unwrap().is_empty());

        let content: Vec<u8> = (0..=255).collect();
        storage.save("binary.bin", &content).unwrap();
        assert_eq!(storage.fetch("binary.bin").unwrap(), content);
    }

    #[test]
    fn test_save_overwrites() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("note.txt", b"first version").unwrap();
        storage.save("note.txt", b"second").unwrap();

        assert_eq!(storage.fetch("note.txt").unwrap(), b"second");
        assert_eq!(storage.list().unwrap(), vec!["note.txt"]);
    }

    #[test]
    fn test_save_strips_directories() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage.save("nested/dir/report.txt", b"data").unwrap();

        assert_eq!(stored.name, "report.txt");
        assert!(storage.root().join("report.txt").is_file());
        assert!(!storage.root().join("nested").exists());
    }

    #[test]
    fn test_fetch_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.fetch("nonexistent.txt");
        assert!(matches!(result, Err(LockerError::NotFound(_))));
    }

    #[test]
    fn test_fetch_directory_is_not_found() {
        let (_temp_dir, storage) = setup_storage();
        fs::create_dir(storage.root().join("subdir")).unwrap();

        assert!(matches!(
            storage.fetch("subdir"),
            Err(LockerError::NotFound(_))
        ));
        assert!(matches!(
            storage.delete("subdir"),
            Err(LockerError::NotFound(_))
        ));
        assert!(storage.root().join("subdir").is_dir());
    }

    #[test]
    fn test_delete_then_delete_again() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("to-delete.txt", b"bye").unwrap();
        storage.delete("to-delete.txt").unwrap();

        assert!(!storage.root().join("to-delete.txt").exists());
        assert!(matches!(
            storage.delete("to-delete.txt"),
            Err(LockerError::NotFound(_))
        ));
    }

    #[test]
    fn test_traversal_rejected_without_mutation() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageGateway::new(temp_dir.path().join("uploads")).unwrap();
        let victim = temp_dir.path().join("victim.txt");
        fs::write(&victim, b"keep me").unwrap();

        for name in ["../victim.txt", "../../etc/passwd", "/etc/passwd", "a\0b"] {
            assert!(matches!(
                storage.save(name, b"pwned"),
                Err(LockerError::InvalidName(_))
            ));
            assert!(matches!(
                storage.fetch(name),
                Err(LockerError::InvalidName(_))
            ));
            assert!(matches!(
                storage.delete(name),
                Err(LockerError::InvalidName(_))
            ));
        }

        assert_eq!(fs::read(&victim).unwrap(), b"keep me");
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = setup_storage();

        assert!(matches!(
            storage.save("", b"data"),
            Err(LockerError::InvalidName(NameError::Empty))
        ));
        assert!(matches!(
            storage.fetch("./"),
            Err(LockerError::InvalidName(NameError::Empty))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageGateway::new(temp_dir.path().join("uploads")).unwrap();
        let secret = temp_dir.path().join("secret.txt");
        fs::write(&secret, b"top secret").unwrap();
        std::os::unix::fs::symlink(&secret, storage.root().join("link.txt")).unwrap();

        assert!(matches!(
            storage.fetch("link.txt"),
            Err(LockerError::InvalidName(NameError::OutsideRoot))
        ));
        assert!(matches!(
            storage.save("link.txt", b"overwrite"),
            Err(LockerError::InvalidName(NameError::OutsideRoot))
        ));
        assert!(matches!(
            storage.delete("link.txt"),
            Err(LockerError::InvalidName(NameError::OutsideRoot))
        ));
        assert_eq!(fs::read(&secret).unwrap(), b"top secret");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageGateway::new(temp_dir.path().join("uploads")).unwrap();
        let target = temp_dir.path().join("created-outside.txt");
        std::os::unix::fs::symlink(&target, storage.root().join("dangling")).unwrap();

        assert!(matches!(
            storage.save("dangling", b"data"),
            Err(LockerError::InvalidName(NameError::OutsideRoot))
        ));
        assert!(!target.exists());
    }
}
