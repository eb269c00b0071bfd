//! Loading-focused tests for configuration
//!
//! File parsing, path resolution, and environment overrides.

#[cfg(test)]
mod loading_tests {
    use std::{collections::HashMap, path::PathBuf};

    use crate::config::{global_config_path, load_config_from, load_toml_file, Config};
    use crate::{Error, Result};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[timing]\ndebounce_ms = 900\n\n[engine]\nprogram = \"pythonw\"\nargs = [\"merge_pdfs.py\"]\n",
        )?;

        let config = load_toml_file(&config_path)?;
        assert_eq!(config.timing.debounce_ms, 900);
        assert_eq!(config.timing.quiescence_ms, 500);
        assert_eq!(config.engine.program, "pythonw");
        assert_eq!(config.engine.args, vec!["merge_pdfs.py"]);
        assert_eq!(config.engine.output_flag, "--output");
        assert_eq!(config.state_dir, None);
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let config_path = temp_dir.path().join("bad_config.toml");
        std::fs::write(&config_path, "state_dir = \n invalid toml [[[")?;

        let result = load_toml_file(&config_path);
        assert!(matches!(result, Err(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_directory_instead_of_file_is_rejected() -> Result<()> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;

        let result = load_toml_file(temp_dir.path());
        assert!(matches!(result, Err(Error::Io(msg)) if msg.contains("directory")));
        Ok(())
    }

    #[test]
    fn test_explicit_file_is_validated() -> Result<()> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[timing]\ndebounce_ms = 0\n")?;

        let result = load_config_from(&config_path);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let result = load_config_from(std::path::Path::new("/nonexistent/fanin/config.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_global_config_path_ends_with_config_toml() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.to_string_lossy().contains("fanin"));
        }
    }

    #[test]
    fn test_env_overrides_timing_and_engine() -> Result<()> {
        let config = Config::default().apply_env(env(&[
            ("FANIN_DEBOUNCE_MS", "150"),
            ("FANIN_QUIESCENCE_MS", " 100 "),
            ("FANIN_LOCK_TIMEOUT_MS", "2000"),
            ("FANIN_LOCK_POLL_MS", "10"),
            ("FANIN_ENGINE_PROGRAM", "/opt/merge/bin/merge"),
            ("FANIN_STATE_DIR", "/var/tmp/fanin"),
        ]))?;

        assert_eq!(config.timing.debounce_ms, 150);
        assert_eq!(config.timing.quiescence_ms, 100);
        assert_eq!(config.timing.lock_timeout_ms, 2000);
        assert_eq!(config.timing.lock_poll_ms, 10);
        assert_eq!(config.engine.program, "/opt/merge/bin/merge");
        assert_eq!(config.state_dir, Some(PathBuf::from("/var/tmp/fanin")));
        Ok(())
    }

    #[test]
    fn test_env_with_no_variables_changes_nothing() -> Result<()> {
        let config = Config::default().apply_env(env(&[]))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_env_non_numeric_millis_is_invalid_config() {
        let result = Config::default().apply_env(env(&[("FANIN_DEBOUNCE_MS", "soon")]));
        assert!(matches!(result, Err(Error::InvalidConfig(msg)) if msg.contains("FANIN_DEBOUNCE_MS")));
    }

    #[test]
    fn test_env_empty_state_dir_is_invalid_config() {
        let result = Config::default().apply_env(env(&[("FANIN_STATE_DIR", "  ")]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
