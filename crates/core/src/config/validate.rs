use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Source timeouts are nonzero
/// - Sources that need an API key have one when enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    for (name, source) in config.sources.iter() {
        if source.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "sources.{}.timeout_secs cannot be 0",
                name
            )));
        }
    }

    // Marvel Rivals rejects unauthenticated requests, so an enabled section
    // without a key would fail every pass.
    if let Some(rivals) = &config.sources.rivals {
        if rivals.enabled && rivals.api_key.as_ref().is_none_or(|k| k.is_empty()) {
            return Err(ConfigError::ValidationError(
                "sources.rivals requires an api_key when enabled".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, SourceConfig, SourcesConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                valorant: Some(SourceConfig::default()),
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            sources: SourcesConfig::default(),
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                cs2: Some(SourceConfig {
                    timeout_secs: 0,
                    ..Default::default()
                }),
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rivals_without_key_fails() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                rivals: Some(SourceConfig::default()),
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rivals_disabled_without_key_ok() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                rivals: Some(SourceConfig {
                    enabled: false,
                    ..Default::default()
                }),
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rivals_with_key_ok() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                rivals: Some(SourceConfig {
                    api_key: Some("key".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_ok());
    }
}
