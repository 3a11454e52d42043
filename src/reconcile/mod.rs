//! Reconciliation: content matching and conflict-safe renames

pub mod engine;
pub mod rename;

pub use engine::{reconcile, ReconcileContext};
pub use rename::rename_target_file;
