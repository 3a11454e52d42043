//! Per-tree content index keyed by relative path

use crate::error::ReconcileError;
use crate::tree::fingerprint;
use crate::tree::walker::{Walker, WalkerConfig};
use crate::types::FileFingerprint;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// In-memory index of one tree: relative path to fingerprint record.
///
/// Backed by an ordered map, so iteration order (and with it the
/// duplicate-content tie-break during candidate search) is the ascending
/// relative path order, stable across runs and platforms.
///
/// Built once per run, read many times, discarded at the end; nothing is
/// persisted across invocations.
#[derive(Debug, Clone)]
pub struct TreeIndex {
    root: PathBuf,
    entries: BTreeMap<PathBuf, FileFingerprint>,
}

impl TreeIndex {
    /// Build an index by walking `root`.
    ///
    /// `tree` labels the per-entry debug lines ("Source" or "Target") so the
    /// two walks of a run are distinguishable in the log output.
    ///
    /// With `eager_fingerprint`, every entry's fast checksum is computed during
    /// the build; otherwise records carry only sizes. Source trees are indexed
    /// eagerly because each entry may be probed by many target files; target
    /// trees are indexed size-only, and the reconciler computes a target's
    /// checksum at most once, only when that entry needs matching.
    #[instrument(skip(root, walker_config), fields(root = %root.display()))]
    pub fn build(
        root: &Path,
        walker_config: WalkerConfig,
        eager_fingerprint: bool,
        tree: &str,
    ) -> Result<Self, ReconcileError> {
        let start = Instant::now();

        let walker = Walker::with_config(root.to_path_buf(), walker_config);
        let files = walker.walk()?;

        let mut entries = BTreeMap::new();
        for file in files {
            debug!(size = file.size, "{}: {}", tree, file.rel_path.display());
            let mut record = FileFingerprint::from_size(file.size);
            if eager_fingerprint {
                record.fast = Some(fingerprint::fast_fingerprint(&root.join(&file.rel_path))?);
            }
            entries.insert(file.rel_path, record);
        }

        info!(
            entry_count = entries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Index built"
        );

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Root directory this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists at exactly this relative path.
    pub fn contains_path(&self, rel_path: &Path) -> bool {
        self.entries.contains_key(rel_path)
    }

    pub fn get(&self, rel_path: &Path) -> Option<&FileFingerprint> {
        self.entries.get(rel_path)
    }

    /// Iterate entries in ascending relative-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileFingerprint)> {
        self.entries.iter()
    }

    /// Find the first entry agreeing with `needle` on size and fast checksum.
    ///
    /// Entries are scanned in ascending path order, so when several files share
    /// identical content the lexicographically smallest path is returned. The
    /// match is a candidate only; the caller must confirm it with deep digests.
    pub fn find_content_match(&self, needle: &FileFingerprint) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(_, record)| record.may_match(needle))
            .map(|(path, _)| path.as_path())
    }
}
