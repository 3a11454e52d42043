//! Presync: rename-aware tree reconciliation
//!
//! Prepares a mirror target for an rsync-style tool: files that were renamed
//! or moved in the source tree are renamed in the target tree by content
//! match, so the mirroring pass treats them as unchanged instead of
//! delete-plus-retransfer.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod tree;
pub mod types;
