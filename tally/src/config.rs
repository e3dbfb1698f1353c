//! Configuration resolution for the counter facility.
//!
//! Counting is controlled by a single environment variable naming the
//! counter file path. The variable is consulted exactly once, when the
//! embedding program calls [`Recorder::from_env`](crate::Recorder::from_env)
//! at process start; there is no way to enable or disable counting mid-run.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Environment variable naming the counter file path.
///
/// Absent (or empty): counting is disabled for the process and no file is
/// touched. Present: the value is the absolute or relative path where the
/// counter file is created at setup.
pub const COUNTERS_ENV: &str = "TALLY_COUNTERS";

/// Resolves the counter file path from the process environment.
///
/// Returns `None` when counting is disabled.
pub fn resolve() -> Option<PathBuf> {
    resolve_from(std::env::var_os(COUNTERS_ENV).as_deref())
}

/// Resolves the counter file path from an explicit configuration value.
///
/// An empty value cannot name a file and disables counting the same way an
/// absent one does.
pub fn resolve_from(value: Option<&OsStr>) -> Option<PathBuf> {
    match value {
        Some(v) if !v.is_empty() => Some(PathBuf::from(v)),
        _ => None,
    }
}
