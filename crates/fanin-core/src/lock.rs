//! Advisory lock over a well-known file path.
//!
//! Every sibling invocation of one session opens the same lock file and takes an
//! exclusive `fs2` lock on it. Acquisition polls until the lock is free or the
//! configured timeout elapses.
//!
//! # Guarantees
//!
//! - **Mutual Exclusion**: at most one holder per lock file across processes
//! - **Automatic Release**: the guard unlocks on drop, on every exit path
//! - **Bounded Waiting**: a contended acquisition ends in [`Locked::TimedOut`]
//! - **Lock file is kept**: removing it while others wait would split the lock

use std::{
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;

use crate::{Error, Result};

/// Result of a bounded lock wait (discriminated union, no panic)
#[derive(Debug)]
#[must_use]
pub enum Locked<T> {
    /// The lock was held while producing the value
    Held(T),
    /// The lock stayed contended for the whole timeout
    TimedOut,
}

impl<T> Locked<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Locked<U> {
        match self {
            Self::Held(value) => Locked::Held(f(value)),
            Self::TimedOut => Locked::TimedOut,
        }
    }

    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Timeout-bounded exclusive lock keyed by a file path.
///
/// # Invariants
///
/// - `timeout > Duration::ZERO`
/// - `poll_interval < timeout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryLock {
    path: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
}

/// Proof that the advisory lock is held. Released when dropped.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    file: File,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the file releases it too
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::debug!("failed to unlock {}: {e}", self.path.display());
        }
        tracing::trace!("released session lock {}", self.path.display());
    }
}

impl AdvisoryLock {
    /// Create a lock handle with validated timing.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if timeout is zero or `poll_interval` is zero or not below timeout
    pub fn new(path: impl Into<PathBuf>, timeout: Duration, poll_interval: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::invalid_config("lock timeout must be > 0"));
        }
        if poll_interval.is_zero() || poll_interval >= timeout {
            return Err(Error::invalid_config(format!(
                "lock poll interval ({poll_interval:?}) must be > 0 and < timeout ({timeout:?})"
            )));
        }
        Ok(Self {
            path: path.into(),
            timeout,
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the lock is held or the timeout elapses.
    ///
    /// # Errors
    ///
    /// `Lock` if the lock file cannot be opened or the OS rejects the lock call
    /// for a reason other than contention.
    pub fn acquire(&self) -> Result<Locked<LockGuard>> {
        let start = Instant::now();

        loop {
            if let Some(guard) = self.try_acquire_once()? {
                tracing::trace!("acquired session lock {}", self.path.display());
                return Ok(Locked::Held(guard));
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                tracing::debug!(
                    "gave up on session lock {} after {}ms",
                    self.path.display(),
                    elapsed.as_millis()
                );
                return Ok(Locked::TimedOut);
            }
            thread::sleep(self.poll_interval.min(self.timeout - elapsed));
        }
    }

    /// Run `f` as a critical section under the lock.
    ///
    /// The guard is dropped when `f` returns, including when it returns an error.
    pub fn with_lock<T, F>(&self, f: F) -> Result<Locked<T>>
    where
        F: FnOnce(&LockGuard) -> Result<T>,
    {
        match self.acquire()? {
            Locked::Held(guard) => f(&guard).map(Locked::Held),
            Locked::TimedOut => Ok(Locked::TimedOut),
        }
    }

    /// Single non-blocking attempt. `Ok(None)` means another holder has it.
    fn try_acquire_once(&self) -> Result<Option<LockGuard>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.lock_error(e))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(LockGuard {
                path: self.path.clone(),
                file,
            })),
            Err(e) if is_contended(&e) => Ok(None),
            Err(e) => Err(self.lock_error(e)),
        }
    }

    fn lock_error(&self, err: io::Error) -> Error {
        Error::Lock {
            path: self.path.clone(),
            source: err.into(),
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
