//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: ~/.config/fanin/config.toml (or an explicit `--config` file)
//! 3. Environment variables: FANIN_*
//! 4. CLI flags (command-specific)
//!
//! # Example Config
//!
//! ```toml
//! state_dir = "/tmp"
//!
//! [timing]
//! debounce_ms = 600
//! quiescence_ms = 500
//! lock_timeout_ms = 10000
//!
//! [engine]
//! program = "pythonw"
//! args = ["C:/tools/merge_pdfs.py"]
//! ```
//!
//! The timing values are tunables, not guarantees: the debounce window only has
//! to outlast the spread between sibling invocations on a given machine.

mod defaults;
mod load;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;
#[cfg(test)]
mod tests_validation;

pub use load::{global_config_path, load_config, load_config_from, load_toml_file};
pub use types::{Config, EngineConfig, TimingConfig};
