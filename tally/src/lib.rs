//! # tally
//!
//! Memory-mapped event counters for instrumenting hot code paths.
//!
//! tally is a Rust library for recording how many times each of a fixed set
//! of labeled events occurs, persisting the counts to a file that can be
//! inspected during or after execution. It is built for low-overhead
//! profiling of generated or hot code where full logging or tracing would
//! distort the numbers being measured.
//!
//! **Status**: This crate is in early development. The API is not yet stable.
//!
//! ## Key Properties
//!
//! - An increment is one relaxed load and one relaxed store into a mapped
//!   page; nothing on the hot path allocates, locks, branches on errors, or
//!   blocks
//! - Counts persist with no explicit flush: the OS writes mapped pages back
//!   at process exit, even after a crash or abort
//! - Disabled-by-default: without the `TALLY_COUNTERS` environment variable
//!   no file is touched and every count is a no-op
//! - Optionally compiled: without the `instrument` cargo feature the whole
//!   facility reduces to empty inline calls the optimizer removes
//! - Works perfectly or stops immediately: a counter file that cannot be
//!   mapped aborts setup rather than degrading into untrustworthy counts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tally::Recorder;
//!
//! // Labels are dense indices assigned by whatever generates the
//! // instrumentation points; the capacity is part of the program.
//! const NCOUNTER: usize = 4;
//!
//! fn main() {
//!     // Once, at process start. Counting stays off unless the
//!     // TALLY_COUNTERS environment variable names a file.
//!     let recorder: Recorder<NCOUNTER> = Recorder::from_env();
//!
//!     for item in 0..1000 {
//!         recorder.count(0); // e.g. "loop entered"
//!         if item % 3 == 0 {
//!             recorder.count(2); // e.g. "slow path taken"
//!         }
//!     }
//!     // No teardown. Counts reach the file when the process exits.
//! }
//! ```
//!
//! Afterwards, decode the file with [`read_counts`] (or `tally-cli dump`):
//!
//! ```rust,no_run
//! # fn main() -> tally::Result<()> {
//! let counts = tally::read_counts_exact("run.counters", 4)?;
//! println!("slow path taken {} times", counts[2]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The single-writer model is assumed and nothing here locks. Concurrent
//! [`Recorder::count`] calls for the same label may lose updates: the
//! increment is a plain read-modify-write, not an atomic add. This is an
//! accepted limitation, kept so the fast path costs what a plain store
//! costs. Counters are approximate under contention, exact without it.
//!
//! ## Modules
//!
//! - [`recorder`] — the increment interface and once-per-process setup
//! - [`file`] — raw memory-mapped counter file (requires `instrument`)
//! - [`config`] — environment-based configuration resolution
//! - [`reader`] — decoding of persisted counter files
//! - [`error`] — error types

pub mod config;
pub mod error;
#[cfg(feature = "instrument")]
pub mod file;
pub mod reader;
pub mod recorder;

// Re-export primary API types at crate root for convenience.
pub use error::{Result, TallyError};
pub use reader::{read_counts, read_counts_exact};
pub use recorder::Recorder;

/// Size of one counter word in bytes.
///
/// Counter files hold native-endian `u64` words; the counter for label `L`
/// lives at byte offset `L * WORD_BYTES`.
pub const WORD_BYTES: usize = size_of::<u64>();
