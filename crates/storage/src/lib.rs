//! devops-tools filesystem adapter.
//!
//! Implements the [`toolkit::FileStore`] trait over `std::fs`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Path resolution against the working directory, UTF-8
//! decoding, parent-directory creation, and the mapping of `std::io::Error`
//! into [`toolkit::ToolkitError`] all live here. The toolkit sees only
//! [`toolkit::FileStore`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toolkit::{normalize_path, FileStore, Result, ToolkitError};

/// A [`FileStore`] backed by the local filesystem.
///
/// Relative paths are joined onto `base`, which defaults to the process
/// working directory at construction time.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base: PathBuf,
}

impl LocalFileStore {
    /// Creates a store rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let base = std::env::current_dir().map_err(|e| io_error(Path::new("."), &e))?;
        Ok(Self { base })
    }

    /// Creates a store rooted at `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the directory relative paths are resolved against.
    pub fn base(&self) -> &Path {
        &self.base
    }
}

fn io_error(path: &Path, err: &io::Error) -> ToolkitError {
    match err.kind() {
        io::ErrorKind::NotFound => ToolkitError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ToolkitError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    }
}

impl FileStore for LocalFileStore {
    fn resolve(&self, path: &Path) -> PathBuf {
        normalize_path(&self.base.join(path))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        tracing::debug!(path = %resolved.display(), "reading file");
        let bytes = fs::read(&resolved).map_err(|e| io_error(&resolved, &e))?;
        String::from_utf8(bytes).map_err(|e| ToolkitError::Io {
            path: resolved,
            message: e.to_string(),
        })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        tracing::debug!(path = %resolved.display(), bytes = text.len(), "writing file");
        fs::write(&resolved, text).map_err(|e| io_error(&resolved, &e))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_the_base() {
        let store = LocalFileStore::with_base("/work/project");
        assert_eq!(
            store.resolve(Path::new("./devops/../config.json")),
            PathBuf::from("/work/project/config.json")
        );
        assert_eq!(
            store.resolve(Path::new("/etc/config.json")),
            PathBuf::from("/etc/config.json")
        );
    }

    #[test]
    fn test_round_trip_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::with_base(dir.path());

        store.write_text(Path::new("out/nested/a.json"), "{}").unwrap();
        assert!(store.is_dir(Path::new("out/nested")));
        assert_eq!(store.read_text(Path::new("out/nested/a.json")).unwrap(), "{}");
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::with_base(dir.path());

        let err = store.read_text(Path::new("missing.json")).unwrap_err();
        assert_eq!(
            err,
            ToolkitError::FileNotFound {
                path: dir.path().join("missing.json")
            }
        );
        assert!(!store.exists(Path::new("missing.json")));
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.dat"), [0xff, 0xfe]).unwrap();
        let store = LocalFileStore::with_base(dir.path());

        assert!(matches!(
            store.read_text(Path::new("bin.dat")),
            Err(ToolkitError::Io { .. })
        ));
    }
}
