//! Configuration loading from files and environment (Immutable functional pattern)
//!
//! This module handles loading configuration from:
//! 1. Built-in defaults
//! 2. Global config: ~/.config/fanin/config.toml
//! 3. Environment variables: FANIN_*
//!
//! All operations return new instances rather than mutating in place.

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from defaults, the global file if present, and the environment
///
/// # Errors
///
/// Returns error if:
/// - Config file is malformed TOML
/// - Config values fail validation
pub fn load_config() -> Result<Config> {
    let config = match global_config_path() {
        Some(path) if path.exists() => load_toml_file(&path)?,
        _ => Config::default(),
    };

    finish(config)
}

/// Load configuration from an explicit file instead of the global one
///
/// # Errors
///
/// Returns error if the file is missing, malformed, or fails validation
pub fn load_config_from(path: &Path) -> Result<Config> {
    finish(load_toml_file(path)?)
}

fn finish(config: Config) -> Result<Config> {
    let config = config.apply_env_vars()?;
    config.validate()?;
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATH HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "fanin")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Load a TOML file; keys it omits keep their defaults
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read
/// - Path is a directory instead of a file
/// - TOML is malformed
pub fn load_toml_file(path: &Path) -> Result<Config> {
    if path.is_dir() {
        return Err(Error::io_error(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io_error(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLE OVERRIDES (Immutable pattern)
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Apply `FANIN_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn apply_env_vars(self) -> Result<Self> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse or a string one is empty
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FANIN_STATE_DIR") {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(
                    "FANIN_STATE_DIR cannot be empty - unset the variable or provide a directory",
                ));
            }
            self.state_dir = Some(PathBuf::from(value));
        }

        let millis = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|e| Error::invalid_config(format!("Invalid {key} value: {e}")))
                })
                .transpose()
        };

        if let Some(ms) = millis("FANIN_DEBOUNCE_MS")? {
            self.timing.debounce_ms = ms;
        }
        if let Some(ms) = millis("FANIN_QUIESCENCE_MS")? {
            self.timing.quiescence_ms = ms;
        }
        if let Some(ms) = millis("FANIN_LOCK_TIMEOUT_MS")? {
            self.timing.lock_timeout_ms = ms;
        }
        if let Some(ms) = millis("FANIN_LOCK_POLL_MS")? {
            self.timing.lock_poll_ms = ms;
        }

        if let Some(value) = lookup("FANIN_ENGINE_PROGRAM") {
            self.engine.program = value;
        }

        Ok(self)
    }
}
