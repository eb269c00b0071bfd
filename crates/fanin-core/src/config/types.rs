//! Configuration type definitions
//!
//! Pure data holders; behavior lives in the sibling modules.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Root configuration structure
///
/// Loaded from defaults → config file → env vars → CLI flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory shared by every invocation of one session. `None` = OS temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    pub timing: TimingConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep between registering and attempting leadership
    pub debounce_ms: u64,
    /// Minimum silence since the last registration before a wave is done
    pub quiescence_ms: u64,
    pub lock_timeout_ms: u64,
    pub lock_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub program: String,
    pub args: Vec<String>,
    pub output_flag: String,
}

impl Config {
    /// State directory in effect for this configuration.
    pub fn session_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl TimingConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub const fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }

    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub const fn lock_poll(&self) -> Duration {
        Duration::from_millis(self.lock_poll_ms)
    }
}
