//! Session state store.
//!
//! A session is every invocation sharing one state directory. Its state lives
//! in a handful of well-known plain-text files:
//!
//! - `fanin_collection.txt`: registered paths, one per line, append-only
//! - `fanin_timestamp.txt`: decimal seconds of the latest registration
//! - `fanin_leader.flag`: existence marker for "this wave has a leader"
//! - `fanin.lock`: the advisory lock guarding all of the above
//!
//! The files come into existence with the first registration of a wave and are
//! removed by that wave's leader. [`SessionState`] can only be obtained through
//! [`SessionStore::locked`], so every read and write happens inside the lock.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    clock::Timestamp,
    config::Config,
    lock::{AdvisoryLock, LockGuard, Locked},
    Error, Result,
};

const COLLECTION_FILE: &str = "fanin_collection.txt";
const TIMESTAMP_FILE: &str = "fanin_timestamp.txt";
const LEADER_FILE: &str = "fanin_leader.flag";
const LOCK_FILE: &str = "fanin.lock";
const ERROR_LOG_FILE: &str = "fanin_error.log";

/// Well-known file locations of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub dir: PathBuf,
    pub collection: PathBuf,
    pub timestamp: PathBuf,
    pub leader_flag: PathBuf,
    pub lock: PathBuf,
    pub error_log: PathBuf,
}

impl SessionPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            collection: dir.join(COLLECTION_FILE),
            timestamp: dir.join(TIMESTAMP_FILE),
            leader_flag: dir.join(LEADER_FILE),
            lock: dir.join(LOCK_FILE),
            error_log: dir.join(ERROR_LOG_FILE),
            dir,
        }
    }

    /// The files a leader removes. The lock file and the error log stay.
    pub fn wave_files(&self) -> [&Path; 3] {
        [&self.collection, &self.timestamp, &self.leader_flag]
    }
}

/// Last-update timestamp as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastUpdate {
    /// No timestamp file: no wave is active
    Absent,
    At(Timestamp),
}

/// Lock-scoped view of the session state.
///
/// Borrowing the [`LockGuard`] ties the view to one critical section.
#[derive(Debug)]
pub struct SessionState<'a> {
    paths: &'a SessionPaths,
    _guard: &'a LockGuard,
}

impl SessionState<'_> {
    /// Append one entry to the collection as its own line.
    pub fn append(&self, entry: &str) -> Result<()> {
        let line = format!("{entry}\n");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.paths.collection)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|e| Error::state_write(&self.paths.collection, e))
    }

    /// Overwrite the last-update timestamp.
    pub fn touch(&self, at: Timestamp) -> Result<()> {
        fs::write(&self.paths.timestamp, at.to_string())
            .map_err(|e| Error::state_write(&self.paths.timestamp, e))
    }

    pub fn last_update(&self) -> Result<LastUpdate> {
        match fs::read_to_string(&self.paths.timestamp) {
            Ok(content) => content
                .parse()
                .map(LastUpdate::At)
                .map_err(|reason| Error::state_read(&self.paths.timestamp, reason)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LastUpdate::Absent),
            Err(e) => Err(Error::state_read(&self.paths.timestamp, e.to_string())),
        }
    }

    pub fn leader_present(&self) -> bool {
        self.paths.leader_flag.exists()
    }

    pub fn set_leader(&self) -> Result<()> {
        fs::write(&self.paths.leader_flag, std::process::id().to_string())
            .map_err(|e| Error::state_write(&self.paths.leader_flag, e))
    }

    /// Remove a leader flag left over from a finished wave. Missing is fine.
    pub fn clear_leader(&self) -> Result<()> {
        remove_if_present(&self.paths.leader_flag)
    }

    /// Every non-blank collection line, in registration order.
    pub fn snapshot(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.paths.collection) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::state_read(&self.paths.collection, e.to_string())),
        }
    }

    /// Remove every wave file, best-effort.
    ///
    /// All files are attempted; the first failure is returned afterwards.
    pub fn clear(&self) -> Result<()> {
        self.paths
            .wave_files()
            .into_iter()
            .map(remove_if_present)
            .fold(Ok(()), |acc, result| acc.and(result))
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::state_write(path, e)),
    }
}

/// Session state files plus the lock that guards them.
#[derive(Debug, Clone)]
pub struct SessionStore {
    paths: SessionPaths,
    lock: AdvisoryLock,
}

impl SessionStore {
    /// Open the store, creating the state directory if needed.
    ///
    /// Nothing but the directory is created; state files appear on first write.
    pub fn open(paths: SessionPaths, lock: AdvisoryLock) -> Result<Self> {
        fs::create_dir_all(&paths.dir).map_err(|e| {
            Error::io_error(format!(
                "Failed to create state directory {}: {e}",
                paths.dir.display()
            ))
        })?;
        Ok(Self { paths, lock })
    }

    /// Store for the state directory and lock timing in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let paths = SessionPaths::in_dir(config.session_dir());
        let lock = AdvisoryLock::new(
            paths.lock.clone(),
            config.timing.lock_timeout(),
            config.timing.lock_poll(),
        )?;
        Self::open(paths, lock)
    }

    pub const fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    /// Run `f` as one critical section over the session state.
    pub fn locked<T, F>(&self, f: F) -> Result<Locked<T>>
    where
        F: FnOnce(&SessionState<'_>) -> Result<T>,
    {
        self.lock.with_lock(|guard| {
            let state = SessionState {
                paths: &self.paths,
                _guard: guard,
            };
            f(&state)
        })
    }
}
