//! Two-tier content fingerprints using BLAKE3
//!
//! The cheap tier samples the file instead of reading it whole; the expensive
//! tier digests every byte. Equal fast fingerprints mean "possibly identical",
//! equal deep fingerprints are treated as proof of identical content.

use crate::error::ReconcileError;
use crate::types::{DeepDigest, FastDigest};
use blake3::Hasher;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes sampled from the head, middle, and tail of large files.
const SAMPLE_BLOCK: u64 = 16 * 1024;

/// Files at or below this size are read whole by the fast fingerprint.
const SAMPLE_THRESHOLD: u64 = 3 * SAMPLE_BLOCK;

/// Compute the sampled fast fingerprint of a file.
///
/// fast = hash(size || head || middle || tail)
///
/// Sub-linear in file size: at most three 16 KiB blocks are read regardless of
/// length, and files at or below the threshold are hashed in full. The size
/// prefix makes truncation alone change the signature. Two files with
/// different fast fingerprints are guaranteed to differ in content; two files
/// with equal fast fingerprints must still be confirmed with
/// [`deep_fingerprint`].
pub fn fast_fingerprint(file_path: &Path) -> Result<FastDigest, ReconcileError> {
    let mut file = open_for_fingerprint(file_path)?;
    let size = file
        .metadata()
        .map_err(|e| fingerprint_error(file_path, e))?
        .len();

    let mut hasher = Hasher::new();
    hasher.update(&size.to_be_bytes());

    if size <= SAMPLE_THRESHOLD {
        let mut content = Vec::with_capacity(size as usize);
        file.read_to_end(&mut content)
            .map_err(|e| fingerprint_error(file_path, e))?;
        hasher.update(&content);
    } else {
        let mut block = vec![0u8; SAMPLE_BLOCK as usize];
        for offset in [0, (size - SAMPLE_BLOCK) / 2, size - SAMPLE_BLOCK] {
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| fingerprint_error(file_path, e))?;
            file.read_exact(&mut block)
                .map_err(|e| fingerprint_error(file_path, e))?;
            hasher.update(&block);
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Compute the full-content deep fingerprint of a file.
///
/// O(file size); the reconciler runs this only on candidate pairs that already
/// agree on size and fast fingerprint.
pub fn deep_fingerprint(file_path: &Path) -> Result<DeepDigest, ReconcileError> {
    let file = open_for_fingerprint(file_path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    std::io::copy(&mut reader, &mut hasher).map_err(|e| fingerprint_error(file_path, e))?;
    Ok(*hasher.finalize().as_bytes())
}

fn open_for_fingerprint(file_path: &Path) -> Result<File, ReconcileError> {
    File::open(file_path).map_err(|e| fingerprint_error(file_path, e))
}

fn fingerprint_error(file_path: &Path, source: std::io::Error) -> ReconcileError {
    ReconcileError::Fingerprint {
        path: file_path.to_path_buf(),
        source,
    }
}
