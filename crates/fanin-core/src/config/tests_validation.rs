//! Validation-focused tests for configuration

#[cfg(test)]
mod validation_tests {
    use std::path::PathBuf;

    use crate::config::Config;
    use crate::Error;

    fn with_timing(debounce: u64, quiescence: u64, timeout: u64, poll: u64) -> Config {
        let mut config = Config::default();
        config.timing.debounce_ms = debounce;
        config.timing.quiescence_ms = quiescence;
        config.timing.lock_timeout_ms = timeout;
        config.timing.lock_poll_ms = poll;
        config
    }

    #[test]
    fn test_accepts_tuned_values() {
        assert!(with_timing(1200, 1000, 30_000, 50).validate().is_ok());
        assert!(with_timing(500, 500, 100, 1).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_or_huge_debounce() {
        assert!(matches!(
            with_timing(0, 0, 10_000, 25).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            with_timing(60_001, 500, 10_000, 25).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_quiescence_longer_than_debounce() {
        let result = with_timing(400, 500, 10_000, 25).validate();
        assert!(matches!(result, Err(Error::InvalidConfig(msg)) if msg.contains("quiescence_ms")));
    }

    #[test]
    fn test_rejects_poll_not_below_timeout() {
        assert!(with_timing(600, 500, 100, 100).validate().is_err());
        assert!(with_timing(600, 500, 100, 0).validate().is_err());
        assert!(with_timing(600, 500, 0, 0).validate().is_err());
    }

    #[test]
    fn test_rejects_blank_engine_program() {
        let mut config = Config::default();
        config.engine.program = "   ".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_blank_output_flag() {
        let mut config = Config::default();
        config.engine.output_flag = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_state_dir() {
        let config = Config {
            state_dir: Some(PathBuf::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
