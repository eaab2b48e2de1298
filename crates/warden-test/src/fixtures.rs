//! Test fixtures backed by the real filesystem.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use warden_workspace::WorkspaceSandbox;

/// A temporary workspace with room for neighbours.
///
/// Layout:
///
/// ```text
/// <tmp>/
///   workspace/      <- the root
///     dir/
///   outside/        <- never inside the root
/// ```
///
/// Everything is removed on drop.
#[derive(Debug)]
pub struct TempWorkspace {
    parent: TempDir,
    root: PathBuf,
}

impl TempWorkspace {
    /// Create the layout.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directories cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let parent = TempDir::new().expect("create temp dir");
        let root = parent.path().join("workspace");
        std::fs::create_dir_all(root.join("dir")).expect("create workspace");
        std::fs::create_dir_all(parent.path().join("outside")).expect("create outside dir");
        Self { parent, root }
    }

    /// The workspace root as created (not canonicalized).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory next to the workspace.
    #[must_use]
    pub fn outside(&self) -> PathBuf {
        self.parent.path().join("outside")
    }

    /// Create a directory next to the workspace, e.g. `workspace2`.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn sibling(&self, name: &str) -> PathBuf {
        let path = self.parent.path().join(name);
        std::fs::create_dir_all(&path).expect("create sibling");
        path
    }

    /// Create a directory inside the workspace.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        std::fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// Write a file at `path` (absolute, or relative to the workspace root).
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.root.join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// Build a host-filesystem sandbox on the root.
    ///
    /// # Panics
    ///
    /// Panics if the sandbox cannot be created.
    #[must_use]
    pub fn sandbox(&self) -> WorkspaceSandbox {
        WorkspaceSandbox::create(&self.root).expect("create sandbox")
    }

    /// Create a directory symlink at `link` (relative to the root).
    ///
    /// # Errors
    ///
    /// Returns the OS error if links cannot be created (e.g. missing
    /// privileges on Windows), so callers can skip the test.
    pub fn symlink_dir(&self, link: &str, target: &Path) -> std::io::Result<PathBuf> {
        let link = self.root.join(link);
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, &link)?;
        #[cfg(windows)]
        std::os::windows::fs::symlink_dir(target, &link)?;
        Ok(link)
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
