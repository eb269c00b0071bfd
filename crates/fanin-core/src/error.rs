//! Error types for fanin-core with categorization:
//!
//! - **Validation errors**: configuration values, config file syntax, invocation
//!   arguments and selected paths the session cannot record (exit code 1)
//! - **System errors**: lock, session state, engine launch and plain IO (exit code 2)
//!
//! Lock contention is not an error. A timed-out acquisition is reported as
//! [`crate::lock::Locked::TimedOut`] and surfaces as an outcome, not through this type.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Top-level error type for every fallible fanin operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration value is out of range or missing
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Invocation arguments could not be parsed
    #[error("usage error: {0}")]
    Usage(String),

    /// Selected path cannot be stored in the line-delimited UTF-8 collection
    #[error("cannot register {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Lock file could not be opened or locked for a reason other than contention
    #[error("session lock {path} failed: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: IoErrorKind,
    },

    /// Session state file exists but could not be read or interpreted
    #[error("cannot read session state {path}: {reason}")]
    StateRead { path: PathBuf, reason: String },

    /// Session state file could not be written or removed
    #[error("cannot write session state {path}: {source}")]
    StateWrite {
        path: PathBuf,
        #[source]
        source: IoErrorKind,
    },

    /// Merge engine could not be started
    #[error("failed to launch merge engine '{program}': {reason}")]
    Launch { program: String, reason: String },

    /// Any other IO failure
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Create a validation error from an invalid config value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a validation error from a config parse failure.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a system error from an IO failure.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn state_write(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::StateWrite {
            path: path.into(),
            source: err.into(),
        }
    }

    pub(crate) fn state_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StateRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable snake_case tag, used by the diagnostic log.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "invalid_config",
            Self::Parse(_) => "parse_error",
            Self::Usage(_) => "usage_error",
            Self::InvalidPath { .. } => "invalid_path",
            Self::Lock { .. } => "lock_error",
            Self::StateRead { .. } => "state_read_error",
            Self::StateWrite { .. } => "state_write_error",
            Self::Launch { .. } => "launch_error",
            Self::Io(_) => "io_error",
        }
    }

    /// Returns the exit code for this error.
    ///
    /// - 1: bad configuration, arguments or path
    /// - 2: system failure (IO, lock, state, launch)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_)
            | Self::Parse(_)
            | Self::Usage(_)
            | Self::InvalidPath { .. } => 1,
            _ => 2,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// IO error kinds (cloneable, no source chain issues)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    WouldBlock,
    InvalidInput,
    TimedOut,
    WriteZero,
    Interrupted,
    UnexpectedEof,
    OutOfMemory,
    Other(String),
}

impl std::fmt::Display for IoErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::AlreadyExists => write!(f, "already exists"),
            Self::WouldBlock => write!(f, "would block"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::TimedOut => write!(f, "timed out"),
            Self::WriteZero => write!(f, "write zero"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::UnexpectedEof => write!(f, "unexpected EOF"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for IoErrorKind {}

impl From<io::Error> for IoErrorKind {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::WouldBlock => Self::WouldBlock,
            io::ErrorKind::InvalidInput => Self::InvalidInput,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::WriteZero => Self::WriteZero,
            io::ErrorKind::Interrupted => Self::Interrupted,
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            io::ErrorKind::OutOfMemory => Self::OutOfMemory,
            _ => Self::Other(err.to_string()),
        }
    }
}

/// Result type alias for fanin-core operations
pub type Result<T> = std::result::Result<T, Error>;
