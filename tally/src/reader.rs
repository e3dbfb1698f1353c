//! Decoding of persisted counter files.
//!
//! The file format is a raw, headerless array of native-endian `u64` words;
//! there is nothing in the file itself to say how many counters it holds or
//! which program wrote it. Agreement on the counter capacity is the reader's
//! responsibility, which is why [`read_counts_exact`] exists alongside the
//! permissive [`read_counts`].
//!
//! These functions read a plain copy of the file through the filesystem, so
//! they work from any process, including while the writer is still running
//! (counts observed mid-run are approximate, like everything else here).

use std::path::Path;

use crate::WORD_BYTES;
use crate::error::{ReadError, Result};

/// Reads and decodes all counters from the file at `path`.
///
/// # Errors
///
/// Returns [`ReadError::Open`] if the file cannot be read and
/// [`ReadError::Malformed`] if its length is not a whole number of counter
/// words.
pub fn read_counts<P: AsRef<Path>>(path: P) -> Result<Vec<u64>> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| ReadError::Open {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    if bytes.len() % WORD_BYTES != 0 {
        return Err(ReadError::Malformed {
            path: path.to_string_lossy().to_string(),
            len: bytes.len() as u64,
            word: WORD_BYTES,
        }
        .into());
    }

    let mut counts = Vec::with_capacity(bytes.len() / WORD_BYTES);
    for chunk in bytes.chunks_exact(WORD_BYTES) {
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(chunk);
        counts.push(u64::from_ne_bytes(word));
    }

    Ok(counts)
}

/// Reads all counters from `path`, requiring exactly `expected` of them.
///
/// This is the check a reader built against a known capacity performs: a
/// file written with a different capacity decodes to nonsense, so a length
/// mismatch is rejected up front.
///
/// # Errors
///
/// As [`read_counts`], plus [`ReadError::LengthMismatch`] if the file holds
/// a different number of counters than `expected`.
pub fn read_counts_exact<P: AsRef<Path>>(path: P, expected: usize) -> Result<Vec<u64>> {
    let path = path.as_ref();
    let counts = read_counts(path)?;

    if counts.len() != expected {
        return Err(ReadError::LengthMismatch {
            path: path.to_string_lossy().to_string(),
            expected,
            actual: counts.len(),
        }
        .into());
    }

    Ok(counts)
}
