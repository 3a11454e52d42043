//! Error types for the presync reconciliation run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a reconciliation run.
///
/// A rename conflict (destination already exists) is deliberately not an error:
/// it is a per-file outcome that the engine records and continues past. Every
/// variant here is fatal to the whole run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fingerprint {path:?}: {source}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from:?} to {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: matched source path equals target path: {0:?}")]
    CandidateIsTarget(PathBuf),
}
