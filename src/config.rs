//! Run configuration: validated roots, flags, and the optional config file

use crate::error::ReconcileError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional TOML configuration file.
///
/// CLI flags always win over file values. The file exists so recurring
/// invocations (cron jobs wrapping a mirror pass) can keep logging and ignore
/// setup out of the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresyncConfig {
    /// Path components skipped while walking both trees
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PresyncConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ReconcileError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReconcileError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            ReconcileError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }
}

/// Validated parameters for one reconciliation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub dry_run: bool,
    pub ignore_patterns: Vec<String>,
}

impl RunConfig {
    /// Validate and absolutize the two roots.
    ///
    /// Both must exist and be directories, and neither may be nested inside
    /// the other (nor may they be the same directory): renaming inside a
    /// target that overlaps the source would break the source tree's
    /// read-only guarantee. All checks run before any tree walk.
    pub fn resolve(
        source: &Path,
        target: &Path,
        dry_run: bool,
        ignore_patterns: Vec<String>,
    ) -> Result<Self, ReconcileError> {
        let source_root = resolve_root(source, "source")?;
        let target_root = resolve_root(target, "target")?;

        if source_root.starts_with(&target_root) || target_root.starts_with(&source_root) {
            return Err(ReconcileError::Config(format!(
                "One directory cannot be within the other: {:?} and {:?}",
                source_root, target_root
            )));
        }

        Ok(Self {
            source_root,
            target_root,
            dry_run,
            ignore_patterns,
        })
    }
}

fn resolve_root(path: &Path, role: &str) -> Result<PathBuf, ReconcileError> {
    let absolute = dunce::canonicalize(path).map_err(|e| {
        ReconcileError::Config(format!(
            "The {} directory {:?} is not accessible: {}",
            role, path, e
        ))
    })?;

    if !absolute.is_dir() {
        return Err(ReconcileError::Config(format!(
            "The {} path {:?} is not a directory",
            role, absolute
        )));
    }

    Ok(absolute)
}
