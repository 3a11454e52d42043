//! Filesystem walker for enumerating regular files under a tree root

use crate::error::ReconcileError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under a walk root.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the walk root.
    pub rel_path: PathBuf,
    /// Byte length from filesystem metadata.
    pub size: u64,
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false; symlinks are skipped)
    pub follow_symlinks: bool,
    /// Path components to skip entirely. Empty by default: a mirroring
    /// pre-pass must see every file unless told otherwise.
    pub ignore_patterns: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree and collect every regular file.
    ///
    /// Entries are relative to the root and sorted by path, so callers that
    /// iterate the result behave identically across runs. Directories,
    /// symlinks, and special files are not reported. Any inaccessible entry
    /// fails the whole walk; a partial index must never be used.
    pub fn walk(&self) -> Result<Vec<FileEntry>, ReconcileError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root).follow_links(self.config.follow_symlinks);

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;

            if !entry.file_type().is_file() {
                continue;
            }

            let rel_path = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| ReconcileError::Walk {
                    path: entry.path().to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "entry is not under the walk root",
                    ),
                })?
                .to_path_buf();

            // Patterns match components of the relative path only, so a root
            // directory that happens to share a pattern's name is unaffected.
            if self.should_ignore(&rel_path) {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| walk_error(entry.path(), e))?;

            entries.push(FileEntry {
                rel_path,
                size: metadata.len(),
            });
        }

        // Sort entries by relative path for determinism
        entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        Ok(entries)
    }

    /// Check if a relative path should be ignored based on ignore patterns
    fn should_ignore(&self, rel_path: &Path) -> bool {
        if self.config.ignore_patterns.is_empty() {
            return false;
        }

        for pattern in &self.config.ignore_patterns {
            for component in rel_path.components() {
                if let std::path::Component::Normal(name) = component {
                    if name.to_string_lossy() == pattern.as_str() {
                        return true;
                    }
                }
            }
        }

        false
    }
}

fn walk_error(fallback: &Path, err: walkdir::Error) -> ReconcileError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    let source = err.into_io_error().unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
    });
    ReconcileError::Walk { path, source }
}
