//! The increment interface and its once-per-process setup.
//!
//! A [`Recorder`] is the object instrumented code holds: either an owned
//! handle to a mapped [`CounterFile`](crate::file::CounterFile), or an inert
//! shell whose [`count`](Recorder::count) does nothing. Which one you get is
//! decided exactly once, at construction, and never changes for the life of
//! the process.
//!
//! With the `instrument` cargo feature disabled (it is on by default), the
//! counting machinery is compiled out entirely: every constructor yields the
//! inert shell, `count` is an empty inline function the optimizer removes,
//! and no file is ever touched regardless of configuration.

use std::path::Path;

use crate::error::Result;

#[cfg(feature = "instrument")]
use crate::config;
#[cfg(feature = "instrument")]
use crate::file::CounterFile;

/// Handle through which instrumented code bumps event counters.
///
/// `N` is the counter capacity; labels are dense indices in `[0, N)`,
/// assigned by whatever generates the instrumentation points. Reader tooling
/// must be built against the same `N`.
///
/// Construct one at process start ([`from_env`](Self::from_env) or
/// [`with_file`](Self::with_file)) and hold it wherever the instrumentation
/// points can reach it. Counting cannot be enabled or disabled mid-run.
#[derive(Debug)]
pub struct Recorder<const N: usize> {
    /// The mapped store, absent when counting is disabled.
    #[cfg(feature = "instrument")]
    counters: Option<CounterFile<N>>,
}

impl<const N: usize> Recorder<N> {
    /// The parameterless setup call: resolve configuration, map the store.
    ///
    /// Consults [`config::COUNTERS_ENV`](crate::config::COUNTERS_ENV) once.
    /// If it is unset the recorder is inert and no file is touched. If it
    /// names a path, the counter file is created there and mapped.
    ///
    /// # Aborts
    ///
    /// If the counter file cannot be created, sized, or mapped, the process
    /// aborts after printing a diagnostic to stderr. There is no degraded
    /// mode: an increment interface that silently lost its mapping would
    /// produce untrustworthy counts, and untrustworthy counts are worse
    /// than none. Embedders that want the failure instead of the abort use
    /// [`with_file`](Self::with_file).
    #[must_use]
    pub fn from_env() -> Self {
        #[cfg(feature = "instrument")]
        {
            let Some(path) = config::resolve() else {
                tracing::debug!(
                    env = config::COUNTERS_ENV,
                    "counting disabled, no counter file configured"
                );
                return Self::disabled();
            };

            match Self::with_file(&path) {
                Ok(recorder) => return recorder,
                Err(e) => {
                    // Straight to stderr: a tracing subscriber may not be
                    // installed yet, and this is the last thing the
                    // process says.
                    eprintln!("tally: {e}");
                    std::process::abort()
                }
            }
        }

        #[cfg(not(feature = "instrument"))]
        Self::disabled()
    }

    /// Creates a recorder counting into the file at `path`.
    ///
    /// The fallible form of setup, for embedders that resolve configuration
    /// themselves. Any existing file at `path` is truncated; all `N`
    /// counters start at zero. With `N == 0` the file is still created
    /// (empty) but nothing is mapped and the recorder is inert.
    ///
    /// With the `instrument` feature disabled this touches nothing and
    /// returns an inert recorder.
    ///
    /// # Errors
    ///
    /// Returns [`CounterFileError`](crate::error::CounterFileError) if the
    /// file cannot be created, sized, or mapped.
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        #[cfg(feature = "instrument")]
        {
            let path = path.as_ref();

            if N == 0 {
                CounterFile::<0>::truncate_only(path)?;
                tracing::debug!(
                    path = %path.display(),
                    "zero counter capacity, file truncated but not mapped"
                );
                return Ok(Self::disabled());
            }

            let counters = CounterFile::create(path)?;
            tracing::debug!(
                path = %path.display(),
                capacity = N,
                "counter file mapped"
            );
            return Ok(Self {
                counters: Some(counters),
            });
        }

        #[cfg(not(feature = "instrument"))]
        {
            let _ = path;
            Ok(Self::disabled())
        }
    }

    /// Returns a permanently inert recorder.
    ///
    /// Every [`count`](Self::count) through it is a no-op. This is what
    /// setup yields when no counter file is configured.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            #[cfg(feature = "instrument")]
            counters: None,
        }
    }

    /// Bumps the counter for `label` by one.
    ///
    /// The single operation exposed to instrumented code: no return value,
    /// no error signaling, cheap enough to call at arbitrary frequency. On
    /// an inert recorder it does nothing.
    ///
    /// `label` must be in `[0, N)`; release builds do not check this (see
    /// [`CounterFile::increment`](crate::file::CounterFile::increment)).
    /// Concurrent calls for the same label may lose counts.
    #[inline]
    pub fn count(&self, label: usize) {
        #[cfg(feature = "instrument")]
        if let Some(counters) = &self.counters {
            counters.increment(label);
        }

        #[cfg(not(feature = "instrument"))]
        let _ = label;
    }

    /// Returns whether this recorder has a live counter store.
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "instrument")]
        return self.counters.is_some();

        #[cfg(not(feature = "instrument"))]
        false
    }

    /// Returns the counter file path, if counting is enabled.
    pub fn path(&self) -> Option<&str> {
        #[cfg(feature = "instrument")]
        return self.counters.as_ref().map(CounterFile::path);

        #[cfg(not(feature = "instrument"))]
        None
    }

    /// Flushes mapped counters back to the file, if counting is enabled.
    ///
    /// Never required for correctness; see
    /// [`CounterFile::flush`](crate::file::CounterFile::flush).
    ///
    /// # Errors
    ///
    /// Returns [`CounterFileError::Flush`](crate::error::CounterFileError::Flush)
    /// if the sync fails.
    pub fn flush(&self) -> Result<()> {
        #[cfg(feature = "instrument")]
        if let Some(counters) = &self.counters {
            return counters.flush();
        }

        Ok(())
    }
}
