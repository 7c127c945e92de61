use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Per-game source adapter configuration. A source is registered for a pass
/// when its section is present and enabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub valorant: Option<SourceConfig>,
    #[serde(default)]
    pub cs2: Option<SourceConfig>,
    #[serde(default)]
    pub pubg: Option<SourceConfig>,
    #[serde(default)]
    pub dota: Option<SourceConfig>,
    #[serde(default)]
    pub fortnite: Option<SourceConfig>,
    #[serde(default)]
    pub rivals: Option<SourceConfig>,
    #[serde(default)]
    pub apex: Option<SourceConfig>,
}

impl SourcesConfig {
    /// Iterate over configured sources as `(name, config)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SourceConfig)> {
        [
            ("valorant", &self.valorant),
            ("cs2", &self.cs2),
            ("pubg", &self.pubg),
            ("dota", &self.dota),
            ("fortnite", &self.fortnite),
            ("rivals", &self.rivals),
            ("apex", &self.apex),
        ]
        .into_iter()
        .filter_map(|(name, cfg)| cfg.as_ref().map(|c| (name, c)))
    }

    /// Names of sources that are present and enabled.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, cfg)| cfg.enabled)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Configuration shared by all source adapters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Whether this source participates in refresh passes (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Override for the source's base URL (useful for tests and mirrors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key for sources that require one.
    /// Can use ${ENV_VAR} style injection via environment overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Dedupe precedence rank; higher wins `(category, id)` collisions
    /// (default: 0, first seen wins).
    #[serde(default)]
    pub precedence: u32,
    /// Request timeout in seconds (default: 30). Expiry counts as the
    /// source being unavailable for that pass.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: None,
            api_key: None,
            precedence: 0,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_timeout() -> u32 {
    30
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub sources: Vec<SanitizedSourceConfig>,
}

/// Sanitized source config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub precedence: u32,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            sources: config
                .sources
                .iter()
                .map(|(name, s)| SanitizedSourceConfig {
                    name: name.to_string(),
                    enabled: s.enabled,
                    base_url: s.base_url.clone(),
                    api_key_configured: s.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                    precedence: s.precedence,
                    timeout_secs: s.timeout_secs,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.sources.enabled_names().is_empty());
    }

    #[test]
    fn test_deserialize_with_server_override() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_source_defaults() {
        let toml = r#"
[sources.valorant]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let valorant = config.sources.valorant.as_ref().unwrap();
        assert!(valorant.enabled);
        assert!(valorant.base_url.is_none());
        assert_eq!(valorant.precedence, 0);
        assert_eq!(valorant.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_full_source_section() {
        let toml = r#"
[sources.rivals]
enabled = true
api_key = "secret"
precedence = 2
timeout_secs = 10

[sources.cs2]
enabled = false
base_url = "http://localhost:9999"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let rivals = config.sources.rivals.as_ref().unwrap();
        assert_eq!(rivals.api_key.as_deref(), Some("secret"));
        assert_eq!(rivals.precedence, 2);
        assert_eq!(rivals.timeout_secs, 10);

        let cs2 = config.sources.cs2.as_ref().unwrap();
        assert!(!cs2.enabled);
        assert_eq!(cs2.base_url.as_deref(), Some("http://localhost:9999"));

        assert_eq!(config.sources.enabled_names(), vec!["rivals"]);
    }

    #[test]
    fn test_sanitized_config_redacts_api_key() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                rivals: Some(SourceConfig {
                    api_key: Some("super-secret".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        };

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.sources.len(), 1);
        assert_eq!(sanitized.sources[0].name, "rivals");
        assert!(sanitized.sources[0].api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_sources_iter_order_is_stable() {
        let config = Config {
            server: ServerConfig::default(),
            sources: SourcesConfig {
                valorant: Some(SourceConfig::default()),
                pubg: Some(SourceConfig::default()),
                apex: Some(SourceConfig::default()),
                ..Default::default()
            },
        };
        let names: Vec<_> = config.sources.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["valorant", "pubg", "apex"]);
    }
}
