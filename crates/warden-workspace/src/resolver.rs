//! The filesystem capability the sandbox depends on.
//!
//! The sandbox never follows links itself; it asks a [`PathResolver`] for the
//! real path. Production code uses [`OsResolver`], tests can inject an
//! in-memory tree.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

/// What sits at a path, without following a final link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link, junction, or other name-surrogate reparse point.
    Link,
    /// Anything else (sockets, devices, FIFOs).
    Other,
}

/// Platform path canonicalization.
///
/// Implementations must be safe to call concurrently.
pub trait PathResolver: Debug + Send + Sync {
    /// Return the fully dereferenced absolute path of an existing entry.
    ///
    /// Every link and junction along the way must be followed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if any component is missing (including the target
    /// of a dangling link) and any other I/O error as-is.
    fn real_path(&self, path: &Path) -> io::Result<PathBuf>;

    /// Probe the entry at `path` without following a final link.
    ///
    /// Returns `Ok(None)` if nothing exists there.
    ///
    /// # Errors
    ///
    /// Returns I/O errors other than `NotFound`.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Identifier of the volume (device) holding `path`, if the platform
    /// exposes one.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading metadata.
    fn volume_id(&self, path: &Path) -> io::Result<Option<u64>> {
        let _ = path;
        Ok(None)
    }
}

/// [`PathResolver`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsResolver;

impl PathResolver for OsResolver {
    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Link
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Ok(Some(kind))
    }

    #[cfg(unix)]
    fn volume_id(&self, path: &Path) -> io::Result<Option<u64>> {
        use std::os::unix::fs::MetadataExt;
        Ok(Some(std::fs::metadata(path)?.dev()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_os_entry_kinds() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let resolver = OsResolver;
        assert_eq!(
            resolver.entry_kind(dir.path()).unwrap(),
            Some(EntryKind::Directory)
        );
        assert_eq!(resolver.entry_kind(&file).unwrap(), Some(EntryKind::File));
        assert_eq!(
            resolver.entry_kind(&dir.path().join("missing")).unwrap(),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_os_dangling_link() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();

        let resolver = OsResolver;
        assert_eq!(resolver.entry_kind(&link).unwrap(), Some(EntryKind::Link));
        let err = resolver.real_path(&link).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_os_volume_id_stable() {
        let dir = TempDir::new().unwrap();
        let resolver = OsResolver;
        let a = resolver.volume_id(dir.path()).unwrap();
        let b = resolver.volume_id(dir.path()).unwrap();
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
