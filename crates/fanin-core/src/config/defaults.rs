//! Default configuration values

use super::types::{Config, EngineConfig, TimingConfig};

pub(super) const DEFAULT_DEBOUNCE_MS: u64 = 600;
pub(super) const DEFAULT_QUIESCENCE_MS: u64 = 500;
pub(super) const DEFAULT_LOCK_TIMEOUT_MS: u64 = 10_000;
pub(super) const DEFAULT_LOCK_POLL_MS: u64 = 25;
pub(super) const DEFAULT_ENGINE_PROGRAM: &str = "fanin-merge";
pub(super) const DEFAULT_OUTPUT_FLAG: &str = "--output";

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: None,
            timing: TimingConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            quiescence_ms: DEFAULT_QUIESCENCE_MS,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            lock_poll_ms: DEFAULT_LOCK_POLL_MS,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENGINE_PROGRAM.to_string(),
            args: Vec::new(),
            output_flag: DEFAULT_OUTPUT_FLAG.to_string(),
        }
    }
}
