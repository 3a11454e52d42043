//! Reconciliation engine: matching target files to renamed source counterparts
//!
//! A file renamed in the source tree looks like delete-plus-add to a path-based
//! mirror. The engine finds such files by content instead, using the cascade
//! size -> fast checksum -> deep digest, and renames the target copy so the
//! mirror pass sees a no-op.

use crate::error::ReconcileError;
use crate::reconcile::rename;
use crate::tree::fingerprint;
use crate::tree::index::TreeIndex;
use crate::types::{FileFingerprint, ReconcileReport, RenameOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Everything one reconciliation run needs; no ambient state.
///
/// The source root is read-only throughout. All filesystem mutation is
/// confined to the target root.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub dry_run: bool,
}

/// Reconcile the target tree against the source index.
///
/// For every target entry without a same-path source counterpart, search the
/// source index for a content match and rename the target file to the matching
/// source path. Target files with no match are left alone; deleting them is
/// the downstream mirroring tool's job, never this one's.
///
/// A rename conflict (destination exists) skips only that entry. Every other
/// failure aborts the run: a pre-pass should stop cleanly rather than hand the
/// mirroring tool a partially reconciled tree.
#[instrument(skip_all, fields(
    source = %ctx.source_root.display(),
    target = %ctx.target_root.display(),
    dry_run = ctx.dry_run,
))]
pub fn reconcile(
    ctx: &ReconcileContext,
    source_index: &TreeIndex,
    target_index: &TreeIndex,
) -> Result<ReconcileReport, ReconcileError> {
    let mut report = ReconcileReport::default();

    for (target_path, target_record) in target_index.iter() {
        reconcile_entry(ctx, source_index, target_path, target_record, &mut report)?;
    }

    info!(
        renamed = report.renamed,
        already_in_place = report.already_in_place,
        unmatched = report.unmatched,
        false_positives = report.false_positives,
        conflicts = report.conflicts,
        "Reconciliation complete"
    );

    Ok(report)
}

fn reconcile_entry(
    ctx: &ReconcileContext,
    source_index: &TreeIndex,
    target_path: &Path,
    target_record: &FileFingerprint,
    report: &mut ReconcileReport,
) -> Result<(), ReconcileError> {
    if source_index.contains_path(target_path) {
        debug!("Skipping: target exists in src: {}", target_path.display());
        report.already_in_place += 1;
        return Ok(());
    }

    // The target file is either deleted in the source or was moved there; a
    // content search settles which. The index record stays size-only; the
    // computed checksum lives in this local copy.
    let mut probe = target_record.clone();
    if probe.fast.is_none() {
        probe.fast = Some(fingerprint::fast_fingerprint(
            &ctx.target_root.join(target_path),
        )?);
    }

    let candidate = match source_index.find_content_match(&probe) {
        Some(path) => path.to_path_buf(),
        None => {
            debug!(
                "Skipping: no src file has the same size/checksum as this target: {}",
                target_path.display()
            );
            report.unmatched += 1;
            return Ok(());
        }
    };

    if candidate.as_path() == target_path {
        // The same-path case already returned above; reaching this means the
        // index and the search disagree.
        return Err(ReconcileError::CandidateIsTarget(target_path.to_path_buf()));
    }

    if !deep_confirm(ctx, &candidate, target_path)? {
        debug!(
            path = %target_path.display(),
            candidate = %candidate.display(),
            "Skipping: fast checksum collision, deep digests differ"
        );
        report.false_positives += 1;
        return Ok(());
    }

    match rename::rename_target_file(&ctx.target_root, target_path, &candidate, ctx.dry_run)? {
        RenameOutcome::Renamed | RenameOutcome::WouldRename => report.renamed += 1,
        RenameOutcome::SkippedExisting => report.conflicts += 1,
    }

    Ok(())
}

/// Confirm a fast-checksum candidate by comparing full-content digests.
///
/// The expensive step of the cascade: runs at most twice per accepted rename
/// and never for pairs already excluded by size or fast checksum.
fn deep_confirm(
    ctx: &ReconcileContext,
    candidate: &Path,
    target_path: &Path,
) -> Result<bool, ReconcileError> {
    let source_digest = fingerprint::deep_fingerprint(&ctx.source_root.join(candidate))?;
    let target_digest = fingerprint::deep_fingerprint(&ctx.target_root.join(target_path))?;

    debug!(
        candidate = %candidate.display(),
        source_digest = %hex::encode(source_digest),
        target_digest = %hex::encode(target_digest),
        "Deep digests compared"
    );

    Ok(source_digest == target_digest)
}
