//! Error types for the tally counter facility.

use thiserror::Error;

/// The main error type for all tally operations.
///
/// Note the deliberate asymmetry with the rest of the crate: the increment
/// hot path never produces an error. Everything here belongs to setup (the
/// write side) or to decoding persisted files (the read side).
#[derive(Error, Debug)]
pub enum TallyError {
    /// Error creating, sizing, or mapping a counter file.
    #[error("counter file error: {0}")]
    CounterFile(#[from] CounterFileError),

    /// Error decoding a persisted counter file.
    #[error("read error: {0}")]
    Read(#[from] ReadError),
}

/// Errors that can occur while setting up the mapped counter store.
///
/// Any of these is unrecoverable at the [`Recorder::from_env`] entry point:
/// the process aborts rather than continuing without a valid mapping.
/// [`Recorder::with_file`] surfaces them to the embedder instead.
///
/// [`Recorder::from_env`]: crate::Recorder::from_env
/// [`Recorder::with_file`]: crate::Recorder::with_file
#[derive(Error, Debug)]
pub enum CounterFileError {
    /// The counter file could not be created or opened write-enabled.
    #[error("failed to create counter file '{path}': {source}")]
    Create {
        /// The path that could not be created.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The counter file could not be extended to the required size.
    #[error("failed to size counter file '{path}' to {size} bytes: {source}")]
    Resize {
        /// The counter file path.
        path: String,
        /// The required size in bytes.
        size: u64,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Memory mapping the counter file failed.
    #[error("failed to map counter file '{path}': {source}")]
    Map {
        /// The counter file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Flushing mapped counters back to the file failed.
    #[error("failed to flush counter file '{path}': {source}")]
    Flush {
        /// The counter file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while decoding a persisted counter file.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The counter file could not be opened or read.
    #[error("failed to read counter file '{path}': {source}")]
    Open {
        /// The counter file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file length is not a whole number of counter words.
    #[error("counter file '{path}' is malformed: {len} bytes is not a multiple of the {word} byte word size")]
    Malformed {
        /// The counter file path.
        path: String,
        /// The actual file length in bytes.
        len: u64,
        /// The counter word size in bytes.
        word: usize,
    },

    /// The file holds a different number of counters than the reader expects.
    ///
    /// The writer's and reader's counter capacity must be identical; this is
    /// the check a reader built against a known capacity performs.
    #[error("counter file '{path}' holds {actual} counters, expected {expected}")]
    LengthMismatch {
        /// The counter file path.
        path: String,
        /// The capacity the reader was built against.
        expected: usize,
        /// The number of whole words actually present.
        actual: usize,
    },
}

/// Type alias for `Result<T, TallyError>`.
pub type Result<T> = std::result::Result<T, TallyError>;
