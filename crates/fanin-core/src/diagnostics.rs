//! Best-effort diagnostic log.
//!
//! Invocations come from a file manager that shows nothing the process prints,
//! so error outcomes are appended to a log file in the state directory instead.
//! Writing the log must never affect the operation being logged: every failure
//! here is swallowed.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{coordinator::Phase, Error};

/// Append-only error log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    log_path: PathBuf,
}

impl Diagnostics {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record a failed phase. Never fails.
    pub fn record(&self, phase: Phase, error: &Error) {
        tracing::warn!("{phase} failed: {error}");
        let message = format!("{phase}: {}: {error}", error.kind());
        if let Err(e) = self.append(&message) {
            tracing::debug!(
                "could not write diagnostic log {}: {e}",
                self.log_path.display()
            );
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let entry = format!("[{timestamp}] {message}\n");

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(entry.as_bytes()))
    }
}
