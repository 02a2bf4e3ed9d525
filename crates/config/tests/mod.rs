//! Configuration loading tests
//!
//! Covers TOML parsing, section defaults and validation failures.

mod loading_tests {
    use mask_config::{ConfigError, LogFormat, MaskConfig, DEFAULT_NATIVE_TOKEN_ADDRESS};
    use std::io::Write;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config = MaskConfig::from_toml_str(
            r#"
            [red_packet]
            chain_id = 56
            speed_up_poll_interval_ms = 3000

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.red_packet.chain_id, 56);
        assert_eq!(config.red_packet.speed_up_poll_interval_ms, 3000);
        assert_eq!(
            config.red_packet.native_token_address,
            DEFAULT_NATIVE_TOKEN_ADDRESS
        );
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!(config.bridge.call_timeout_ms.is_none());
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let result = MaskConfig::from_toml_str(
            r#"
            [red_packet]
            speed_up_poll_interval_ms = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_contract_address_is_rejected() {
        let result = MaskConfig::from_toml_str(
            r#"
            [red_packet]
            contract_address = "0xnothex"
            "#,
        );
        match result {
            Err(ConfigError::Invalid(message)) => {
                assert!(message.contains("red_packet.contract_address"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_is_a_parse_error() {
        let result = MaskConfig::from_toml_str("[bridge\ncall_timeout_ms = 5");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bridge]\ncall_timeout_ms = 1500\nchannel_capacity = 8").unwrap();

        let config = MaskConfig::load(file.path()).unwrap();
        assert_eq!(config.bridge.call_timeout_ms, Some(1500));
        assert_eq!(config.bridge.channel_capacity, 8);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MaskConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
