//! Memory-mapped counter file, the backing store for event counts.
//!
//! A counter file is the simplest format tally could get away with: a flat,
//! headerless array of `N` native-endian `u64` words, where the word at byte
//! offset `label * 8` is the count for that label. `N` is a compile-time
//! constant and must be identical between the program writing the file and
//! any tool reading it back.
//!
//! # File Format
//!
//! ```text
//! [0..8)         count for label 0
//! [8..16)        count for label 1
//! ...
//! [8*(N-1)..8*N) count for label N-1
//! ```
//!
//! The file is created (or overwritten) and mapped exactly once, at setup.
//! It is mutated in place for the rest of the process and never needs an
//! explicit flush: the operating system writes mapped pages back when the
//! mapping goes away, at the latest at process exit.
//!
//! # Safety
//!
//! This module uses unsafe operations for direct access to the mmap'd
//! region. The mapping is sized and aligned at creation; the hot-path
//! accessor assumes in-range labels for maximum performance and only
//! verifies them in debug builds.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use memmap2::MmapMut;

use crate::WORD_BYTES;
use crate::error::{CounterFileError, Result};

/// A fixed array of `N` event counters backed by a shared file mapping.
///
/// Stores to the counters land in the page cache and reach the file without
/// any further action from this type. Dropping the store unmaps the region;
/// the file itself stays behind as the persisted artifact.
///
/// # Thread Safety
///
/// All counter access is through atomic loads and stores, so sharing a
/// `CounterFile` across threads is sound. [`increment`](Self::increment) is
/// still a read-modify-write with no atomic add: concurrent increments of
/// the same label may lose counts. Single-writer use is the intended model.
#[derive(Debug)]
pub struct CounterFile<const N: usize> {
    /// Base of the counter array inside the mapping.
    base: *mut AtomicU64,
    /// Owns the mapped region for the life of the store.
    mmap: MmapMut,
    /// Path to the counter file (for error reporting).
    path: String,
}

// SAFETY: `base` points into the region owned by `mmap`, which lives exactly
// as long as the struct, and every access through it is atomic.
unsafe impl<const N: usize> Send for CounterFile<N> {}

// SAFETY: all reads and writes through `base` use atomic operations, so
// shared access cannot produce a data race in the language sense. Lost
// updates under concurrent increments are a documented semantic property,
// not a memory-safety concern.
unsafe impl<const N: usize> Sync for CounterFile<N> {}

impl<const N: usize> CounterFile<N> {
    /// Exact size of the backing file in bytes.
    pub const SIZE_BYTES: usize = N * WORD_BYTES;

    /// Creates the counter file at `path` and maps it.
    ///
    /// Any existing file at `path` is truncated first, so every setup starts
    /// from `N` zero counters regardless of what a previous run left behind.
    /// The file is extended sparsely to [`Self::SIZE_BYTES`] and mapped
    /// writable and shared.
    ///
    /// `N` must be nonzero; a zero-length file cannot be mapped. The
    /// recorder handles the zero-capacity configuration before ever calling
    /// this.
    ///
    /// # Errors
    ///
    /// Returns [`CounterFileError`] if the file cannot be created, sized,
    /// or mapped. Callers on the setup path treat all of these as fatal;
    /// see [`Recorder::from_env`](crate::Recorder::from_env).
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug_assert!(N > 0, "zero-capacity counter files are never mapped");

        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| CounterFileError::Create {
                path: path_str.clone(),
                source: e,
            })?;

        // Sparse extension: the kernel zero-fills, so all counters start at 0.
        file.set_len(Self::SIZE_BYTES as u64)
            .map_err(|e| CounterFileError::Resize {
                path: path_str.clone(),
                size: Self::SIZE_BYTES as u64,
                source: e,
            })?;

        // SAFETY: the file was just created with exclusive write access and
        // sized to the full mapped extent.
        let mut mmap = unsafe {
            MmapMut::map_mut(&file).map_err(|e| CounterFileError::Map {
                path: path_str.clone(),
                source: e,
            })?
        };

        let base = mmap.as_mut_ptr().cast::<AtomicU64>();

        Ok(Self {
            base,
            mmap,
            path: path_str,
        })
    }

    /// Creates or truncates the file at `path` without mapping it.
    ///
    /// This is the zero-capacity path: the file side effect of setup is
    /// preserved (an empty counter file appears on disk) but there is
    /// nothing to map and no store is constructed.
    pub(crate) fn truncate_only<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)
            .map_err(|e| CounterFileError::Create {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        Ok(())
    }

    /// Returns the counter slot for `label`.
    ///
    /// This is the single place indexing happens. Release builds perform no
    /// bounds check; an out-of-range label is a caller contract violation.
    /// Debug builds panic on it.
    #[inline]
    fn slot(&self, label: usize) -> &AtomicU64 {
        debug_assert!(label < N, "label {label} out of range for {N} counters");
        // SAFETY: the mapping is page-aligned and N words long, so any label
        // in [0, N) addresses a properly aligned AtomicU64 inside it. The
        // caller guarantees the range (verified above in debug builds only).
        unsafe { &*self.base.add(label) }
    }

    /// Bumps the counter for `label` by one, wrapping on overflow.
    ///
    /// This is a plain read-modify-write, deliberately not an atomic add:
    /// two threads incrementing the same label at the same time may store
    /// the same value and lose a count. Keeping the fast path free of atomic
    /// read-modify-write instructions is the point of this store.
    #[inline]
    pub fn increment(&self, label: usize) {
        let slot = self.slot(label);
        slot.store(
            slot.load(Ordering::Relaxed).wrapping_add(1),
            Ordering::Relaxed,
        );
    }

    /// Returns the current count for `label`.
    ///
    /// Same indexing contract as [`increment`](Self::increment).
    #[inline]
    pub fn get(&self, label: usize) -> u64 {
        self.slot(label).load(Ordering::Relaxed)
    }

    /// Copies all `N` counters out of the mapping.
    pub fn snapshot(&self) -> Vec<u64> {
        (0..N).map(|label| self.get(label)).collect()
    }

    /// Returns the number of counters, `N`.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Flushes the mapped counters back to the file.
    ///
    /// Never required for correctness: the operating system writes dirty
    /// pages back when the mapping is released, at the latest at process
    /// exit. Exposed for embedders and tests that want the file current at
    /// a known point mid-run.
    ///
    /// # Errors
    ///
    /// Returns [`CounterFileError::Flush`] if the sync fails.
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush().map_err(|e| {
            CounterFileError::Flush {
                path: self.path.clone(),
                source: e,
            }
            .into()
        })
    }

    /// Returns the path to the counter file.
    pub fn path(&self) -> &str {
        &self.path
    }
}
