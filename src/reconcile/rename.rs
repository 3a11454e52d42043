//! Conflict-safe rename inside the target tree

use crate::error::ReconcileError;
use crate::types::RenameOutcome;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Move `old_rel` to `new_rel` under `target_root`.
///
/// Never overwrites: if the destination already exists the move is skipped
/// and reported, leaving both files untouched. Missing intermediate
/// directories are created first. In dry-run mode the intended move is
/// reported and the filesystem is not touched. Any directory-creation or move
/// failure is fatal to the run.
pub fn rename_target_file(
    target_root: &Path,
    old_rel: &Path,
    new_rel: &Path,
    dry_run: bool,
) -> Result<RenameOutcome, ReconcileError> {
    let old_abs = target_root.join(old_rel);
    let new_abs = target_root.join(new_rel);

    if new_abs.exists() {
        info!(
            "Skipping rename of {} to {} because target already exists",
            old_rel.display(),
            new_rel.display()
        );
        return Ok(RenameOutcome::SkippedExisting);
    }

    if dry_run {
        info!(
            "[Dry-run]: Renaming {} to {}",
            old_rel.display(),
            new_rel.display()
        );
        return Ok(RenameOutcome::WouldRename);
    }

    info!("Renaming {} to {}", old_rel.display(), new_rel.display());

    let rename_error = |source| ReconcileError::Rename {
        from: old_rel.to_path_buf(),
        to: new_rel.to_path_buf(),
        source,
    };

    if let Some(parent) = new_abs.parent() {
        debug!(dir = %parent.display(), "Creating directory");
        fs::create_dir_all(parent).map_err(rename_error)?;
    }
    fs::rename(&old_abs, &new_abs).map_err(rename_error)?;

    Ok(RenameOutcome::Renamed)
}
