//! Marvel Rivals hero source (marvelrivalsapi.com).
//!
//! The only source in the set that requires an API key, sent as an
//! `x-api-key` header. Hero image paths are relative to the API host.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::{AttrValue, Item};
use crate::config::SourceConfig;

use super::{
    attr_text, collection_values, string_field, RawBatch, SourceAdapter, SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://marvelrivalsapi.com/api/v1";

/// Relative image paths resolve against the API host itself.
const IMAGE_HOST: &str = "https://marvelrivalsapi.com";

pub struct RivalsSource {
    client: SourceClient,
    base_url: String,
    api_key: String,
    precedence: u32,
}

impl RivalsSource {
    /// Create a new Marvel Rivals source. Fails when no API key is
    /// configured, since the upstream rejects unauthenticated requests.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let api_key = config.api_key.unwrap_or_default();
        if api_key.is_empty() {
            return Err(SourceError::NotConfigured(
                "Marvel Rivals API key is required".to_string(),
            ));
        }

        Ok(Self {
            client: SourceClient::new(config.timeout_secs),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            precedence: config.precedence,
        })
    }
}

#[async_trait]
impl SourceAdapter for RivalsSource {
    fn name(&self) -> &str {
        "rivals"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let url = format!("{}/heroes", self.base_url.trim_end_matches('/'));
        let body = self
            .client
            .get_json_with_key(&url, "x-api-key", &self.api_key)
            .await?;

        Ok(vec![RawBatch {
            category: "Hero".to_string(),
            records: collection_values(body),
        }])
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let id = string_field(record, &["id"])?;
        let name = string_field(record, &["name"])?;

        let image_url = match string_field(record, &["imageUrl"]) {
            Some(image) if image.starts_with("http") => image,
            Some(image) => format!("{}{}", IMAGE_HOST, image),
            None => String::new(),
        };

        let mut attributes = BTreeMap::new();
        attr_text(&mut attributes, "role", record, "role");
        attr_text(&mut attributes, "attack_type", record, "attack_type");
        attr_text(&mut attributes, "difficulty", record, "difficulty");
        attr_text(&mut attributes, "real_name", record, "real_name");
        if let Some(teams) = record["team"].as_array() {
            let teams: Vec<&str> = teams.iter().filter_map(|t| t.as_str()).collect();
            if !teams.is_empty() {
                attributes.insert("team".to_string(), AttrValue::Text(teams.join(", ")));
            }
        }

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url,
            description: string_field(record, &["bio"]),
            attributes,
            source_id: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> RivalsSource {
        RivalsSource::new(SourceConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_without_api_key_fails() {
        let result = RivalsSource::new(SourceConfig::default());
        assert!(matches!(result, Err(SourceError::NotConfigured(_))));

        let result = RivalsSource::new(SourceConfig {
            api_key: Some(String::new()),
            ..Default::default()
        });
        assert!(matches!(result, Err(SourceError::NotConfigured(_))));
    }

    #[test]
    fn test_map_hero_record() {
        let record = json!({
            "id": "1011",
            "name": "Hulk",
            "real_name": "Bruce Banner",
            "imageUrl": "/rivals/heroes/hulk.png",
            "role": "Vanguard",
            "attack_type": "Melee Heroes",
            "difficulty": "2",
            "team": ["Avengers", "Gamma Flight"],
            "bio": "A gamma-powered goliath."
        });

        let item = source().map_record("Hero", &record).unwrap();
        assert_eq!(item.id, "1011");
        assert_eq!(item.name, "Hulk");
        assert_eq!(item.image_url, "https://marvelrivalsapi.com/rivals/heroes/hulk.png");
        assert_eq!(item.attributes["role"].as_text(), Some("Vanguard"));
        assert_eq!(item.attributes["team"].as_text(), Some("Avengers, Gamma Flight"));
        assert_eq!(item.description.as_deref(), Some("A gamma-powered goliath."));
    }

    #[test]
    fn test_numeric_hero_id_stringified() {
        let record = json!({"id": 1022, "name": "Hela"});
        let item = source().map_record("Hero", &record).unwrap();
        assert_eq!(item.id, "1022");
    }

    #[test]
    fn test_hero_without_name_dropped() {
        let record = json!({"id": "1033"});
        assert!(source().map_record("Hero", &record).is_none());
    }
}
