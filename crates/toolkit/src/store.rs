//! File access port.
//!
//! Toolkit operations read templates and config files and write processed
//! output, but never touch the filesystem directly. They go through
//! [`FileStore`], which the `storage` crate implements over `std::fs`.
//! [`MemoryFileStore`] is a map-backed implementation for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::comments::parse_jsonc;
use crate::errors::{Result, ToolkitError};

/// Text file access used by every toolkit operation that touches files.
///
/// Implementations resolve relative paths against their own base directory;
/// errors always carry the resolved path.
pub trait FileStore: Send + Sync {
    /// Returns the absolute, lexically normalised form of `path`.
    fn resolve(&self, path: &Path) -> PathBuf;

    /// Reads a UTF-8 text file.
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Writes a UTF-8 text file, replacing any previous content.
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;

    /// Returns `true` if `path` is an existing file or directory.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Reads `path` through `store` and parses it as JSON with line comments.
pub fn read_jsonc(store: &dyn FileStore, path: &Path) -> Result<Value> {
    let resolved = store.resolve(path);
    let text = store.read_text(&resolved)?;
    parse_jsonc(&text, &resolved.display().to_string())
}

/// Removes `.` components and folds `..` into their parent without touching
/// the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A [`FileStore`] held entirely in memory.
///
/// Directories exist implicitly as ancestors of stored files, or explicitly
/// via [`MemoryFileStore::add_dir`].
#[derive(Debug)]
pub struct MemoryFileStore {
    base: PathBuf,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFileStore {
    /// Creates an empty store whose working directory is `/`.
    pub fn new() -> Self {
        Self::with_base("/")
    }

    /// Creates an empty store that resolves relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Adds a file, returning `self` for chaining.
    pub fn with_file(self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl AsRef<Path>, text: impl Into<String>) {
        let resolved = self.resolve(path.as_ref());
        self.lock().files.insert(resolved, text.into());
    }

    /// Registers an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let resolved = self.resolve(path.as_ref());
        self.lock().dirs.insert(resolved);
    }

    /// Returns the content of a stored file.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        let resolved = self.resolve(path.as_ref());
        self.lock().files.get(&resolved).cloned()
    }

    /// Returns every stored file path in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned map is still structurally valid.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for MemoryFileStore {
    fn resolve(&self, path: &Path) -> PathBuf {
        normalize_path(&self.base.join(path))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        self.lock()
            .files
            .get(&resolved)
            .cloned()
            .ok_or(ToolkitError::FileNotFound { path: resolved })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let resolved = self.resolve(path);
        self.lock().files.insert(resolved, text.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let resolved = self.resolve(path);
        let is_file = self.lock().files.contains_key(&resolved);
        is_file || self.is_dir(&resolved)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let resolved = self.resolve(path);
        let state = self.lock();
        state.dirs.contains(&resolved)
            || state
                .files
                .keys()
                .chain(state.dirs.iter())
                .any(|p| p != &resolved && p.starts_with(&resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/stack/./nested/../vpc.json")),
            PathBuf::from("/stack/vpc.json")
        );
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn test_memory_store_resolves_relative_paths() {
        let store = MemoryFileStore::with_base("/work").with_file("data.json", "{}");
        assert_eq!(store.read_text(Path::new("/work/data.json")).unwrap(), "{}");
        assert_eq!(store.read_text(Path::new("./data.json")).unwrap(), "{}");
        assert!(store.exists(Path::new("data.json")));
        assert!(store.is_dir(Path::new("/work")));
        assert!(!store.is_dir(Path::new("/work/data.json")));
    }

    #[test]
    fn test_missing_file_reports_resolved_path() {
        let store = MemoryFileStore::with_base("/work");
        let err = store.read_text(Path::new("nope.json")).unwrap_err();
        assert_eq!(
            err,
            ToolkitError::FileNotFound {
                path: PathBuf::from("/work/nope.json")
            }
        );
    }

    #[test]
    fn test_explicit_directories() {
        let store = MemoryFileStore::new();
        assert!(!store.is_dir(Path::new("/config")));
        store.add_dir("/config");
        assert!(store.is_dir(Path::new("/config")));
        assert!(store.exists(Path::new("/config")));
    }

    #[test]
    fn test_read_jsonc_strips_comments() {
        let store = MemoryFileStore::new().with_file("/a.json", "{\"a\": 1} # one");
        assert_eq!(read_jsonc(&store, Path::new("/a.json")).unwrap(), json!({"a": 1}));

        let store = MemoryFileStore::new().with_file("/bad.json", "{");
        let err = read_jsonc(&store, Path::new("/bad.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to load json from '/bad.json'"));
    }
}
