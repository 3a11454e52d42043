//! Tree walking, fingerprinting, and indexing
//!
//! One walk per root produces an ordered index from relative path to
//! fingerprint record. Reconciliation reads the finished indices, never the
//! walker, so the target tree is fully enumerated before it is mutated.

pub mod fingerprint;
pub mod index;
pub mod walker;
