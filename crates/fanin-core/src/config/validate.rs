//! Configuration validation

use super::types::Config;
use crate::{Error, Result};

const MAX_WINDOW_MS: u64 = 60_000;

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any values are out of range or invalid
    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;

        if timing.debounce_ms == 0 || timing.debounce_ms > MAX_WINDOW_MS {
            return Err(Error::invalid_config(format!(
                "debounce_ms must be 1-{MAX_WINDOW_MS}"
            )));
        }

        if timing.quiescence_ms == 0 || timing.quiescence_ms > MAX_WINDOW_MS {
            return Err(Error::invalid_config(format!(
                "quiescence_ms must be 1-{MAX_WINDOW_MS}"
            )));
        }

        // An instance that waited out its own debounce must be able to see its
        // wave as quiet, or a lone invocation would never elect a leader.
        if timing.quiescence_ms > timing.debounce_ms {
            return Err(Error::invalid_config(format!(
                "quiescence_ms ({}) must not exceed debounce_ms ({})",
                timing.quiescence_ms, timing.debounce_ms
            )));
        }

        if timing.lock_timeout_ms == 0 {
            return Err(Error::invalid_config("lock_timeout_ms must be > 0"));
        }

        if timing.lock_poll_ms == 0 || timing.lock_poll_ms >= timing.lock_timeout_ms {
            return Err(Error::invalid_config(format!(
                "lock_poll_ms ({}) must be > 0 and < lock_timeout_ms ({})",
                timing.lock_poll_ms, timing.lock_timeout_ms
            )));
        }

        if self.engine.program.trim().is_empty() {
            return Err(Error::invalid_config(
                "engine.program cannot be empty - name the merge engine executable",
            ));
        }

        if self.engine.output_flag.trim().is_empty() {
            return Err(Error::invalid_config("engine.output_flag cannot be empty"));
        }

        if let Some(dir) = &self.state_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::invalid_config("state_dir cannot be empty"));
            }
        }

        Ok(())
    }
}
