//! End-to-end reconciliation scenarios
//!
//! Each test builds a source and a target tree on disk, runs a full
//! reconciliation (index both trees, then reconcile), and asserts on the
//! resulting target tree and decision tallies.

use presync::reconcile::{reconcile, ReconcileContext};
use presync::tree::index::TreeIndex;
use presync::tree::walker::WalkerConfig;
use presync::types::ReconcileReport;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn run_reconcile(source: &Path, target: &Path, dry_run: bool) -> ReconcileReport {
    let source_index = TreeIndex::build(source, WalkerConfig::default(), true, "Source").unwrap();
    let target_index = TreeIndex::build(target, WalkerConfig::default(), false, "Target").unwrap();
    let ctx = ReconcileContext {
        source_root: source.to_path_buf(),
        target_root: target.to_path_buf(),
        dry_run,
    };
    reconcile(&ctx, &source_index, &target_index).unwrap()
}

/// Snapshot of a tree: relative path -> file contents.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            files.insert(rel, fs::read(entry.path()).unwrap());
        }
    }
    files
}

/// Same content at a different path: the target copy is renamed to match.
#[test]
fn test_renamed_file_is_moved_in_target() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(target.path().join("b.txt"), "X").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.renamed, 1);
    assert!(!target.path().join("b.txt").exists());
    assert_eq!(
        fs::read_to_string(target.path().join("a.txt")).unwrap(),
        "X"
    );
}

/// Same path in both trees: no action, whatever the contents.
#[test]
fn test_same_path_is_left_alone() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(target.path().join("a.txt"), "X").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.already_in_place, 1);
    assert_eq!(report.renamed, 0);
    assert_eq!(
        fs::read_to_string(target.path().join("a.txt")).unwrap(),
        "X"
    );
}

/// No content match anywhere in the source: the target file stays; deleting
/// it is the mirroring tool's job.
#[test]
fn test_unmatched_target_file_is_untouched() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(target.path().join("b.txt"), "Y").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.unmatched, 1);
    assert_eq!(report.renamed, 0);
    assert_eq!(
        fs::read_to_string(target.path().join("b.txt")).unwrap(),
        "Y"
    );
}

/// Duplicate content at two source paths: exactly one is chosen, and the
/// ordered index makes it the lexicographically smallest.
#[test]
fn test_duplicate_source_content_renames_to_exactly_one() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(source.path().join("c.txt"), "X").unwrap();
    fs::write(target.path().join("b.txt"), "X").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.renamed, 1);
    assert!(!target.path().join("b.txt").exists());

    let at_a = target.path().join("a.txt").exists();
    let at_c = target.path().join("c.txt").exists();
    assert!(at_a ^ at_c, "exactly one of the duplicates must be chosen");
    assert!(at_a, "the smallest candidate path wins");
}

/// The computed destination already exists in the target: the rename is
/// skipped, both files stay, and the conflict is counted.
#[test]
fn test_existing_destination_is_never_overwritten() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(target.path().join("b.txt"), "X").unwrap();
    fs::write(target.path().join("a.txt"), "UNRELATED").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.conflicts, 1);
    assert_eq!(
        fs::read_to_string(target.path().join("b.txt")).unwrap(),
        "X"
    );
    assert_eq!(
        fs::read_to_string(target.path().join("a.txt")).unwrap(),
        "UNRELATED"
    );
}

/// Dry-run reports the same decisions but leaves the target tree
/// byte-identical.
#[test]
fn test_dry_run_changes_nothing() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::write(target.path().join("b.txt"), "X").unwrap();

    let before = snapshot(target.path());
    let dry_report = run_reconcile(source.path(), target.path(), true);
    let after = snapshot(target.path());

    assert_eq!(dry_report.renamed, 1);
    assert_eq!(before, after);

    // The real run makes the same decision.
    let real_report = run_reconcile(source.path(), target.path(), false);
    assert_eq!(real_report.renamed, dry_report.renamed);
}

/// Running twice with no external change performs zero renames the second
/// time.
#[test]
fn test_reconciliation_is_idempotent() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("kept.txt"), "same").unwrap();
    fs::write(source.path().join("renamed.txt"), "A").unwrap();
    fs::create_dir(source.path().join("docs")).unwrap();
    fs::write(source.path().join("docs").join("readme.md"), "B").unwrap();

    fs::write(target.path().join("kept.txt"), "same").unwrap();
    fs::write(target.path().join("old_name.txt"), "A").unwrap();
    fs::write(target.path().join("readme.md"), "B").unwrap();

    let first = run_reconcile(source.path(), target.path(), false);
    assert!(first.renamed > 0);

    let second = run_reconcile(source.path(), target.path(), false);
    assert_eq!(second.renamed, 0);
    assert_eq!(second.conflicts, 0);
}

/// A move into a subdirectory creates the intermediate directories in the
/// target tree.
#[test]
fn test_rename_into_new_subdirectory() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::create_dir_all(source.path().join("archive/2024")).unwrap();
    fs::write(source.path().join("archive/2024/report.txt"), "data").unwrap();
    fs::write(target.path().join("report.txt"), "data").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.renamed, 1);
    assert_eq!(
        fs::read_to_string(target.path().join("archive/2024/report.txt")).unwrap(),
        "data"
    );
}

/// The source tree is read-only throughout.
#[test]
fn test_source_tree_is_immutable() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();
    fs::create_dir(source.path().join("sub")).unwrap();
    fs::write(source.path().join("sub").join("b.txt"), "Y").unwrap();
    fs::write(target.path().join("moved_a.txt"), "X").unwrap();
    fs::write(target.path().join("moved_b.txt"), "Y").unwrap();

    let before = snapshot(source.path());
    run_reconcile(source.path(), target.path(), false);
    let after = snapshot(source.path());

    assert_eq!(before, after);
}

/// Equal-size files with different contents are told apart by the fast
/// checksum alone; no rename, no deep digest needed.
#[test]
fn test_equal_size_different_content_does_not_match() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "AAAA").unwrap();
    fs::write(target.path().join("b.txt"), "BBBB").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report.unmatched, 1);
    assert_eq!(report.renamed, 0);
    assert!(target.path().join("b.txt").exists());
}

/// An empty target tree reconciles cleanly against any source.
#[test]
fn test_empty_target_tree() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "X").unwrap();

    let report = run_reconcile(source.path(), target.path(), false);

    assert_eq!(report, ReconcileReport::default());
}
