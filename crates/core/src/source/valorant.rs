//! Valorant content source (valorant-api.com).
//!
//! No API key required. Every endpoint wraps its payload in a
//! `{status, data}` envelope.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Item;
use crate::config::SourceConfig;

use super::{
    attr_text, collection_values, string_field, unwrap_envelope, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://valorant-api.com/v1";

/// Endpoint path and the category label assigned to its records.
const ENDPOINTS: &[(&str, &str)] = &[
    ("agents", "Agent"),
    ("maps", "Map"),
    ("weapons/skins", "Skin"),
    ("buddies", "Gun Buddy"),
    ("playercards", "Player Card"),
    ("sprays", "Spray"),
    ("gamemodes", "Game Mode"),
];

pub struct ValorantSource {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl ValorantSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            client: SourceClient::new(config.timeout_secs),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            precedence: config.precedence,
        }
    }
}

#[async_trait]
impl SourceAdapter for ValorantSource {
    fn name(&self) -> &str {
        "valorant"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let fetches = ENDPOINTS.iter().map(|(path, category)| {
            let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
            async move {
                let body = self.client.get_json(&url).await?;
                Ok::<RawBatch, SourceError>(RawBatch {
                    category: (*category).to_string(),
                    records: collection_values(unwrap_envelope(body)),
                })
            }
        });

        futures::future::try_join_all(fetches).await
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        // Non-playable agent entries duplicate playable ones (e.g. Sova's
        // NPC variant) and are skipped outright.
        if category == "Agent" && record["isPlayableCharacter"] == Value::Bool(false) {
            return None;
        }

        let id = string_field(record, &["uuid"])?;
        let name = string_field(record, &["displayName"])?;

        // Agents look best as full portraits, maps as splash art; everything
        // else uses the plain display icon.
        let image_url = match category {
            "Agent" => string_field(record, &["fullPortrait", "displayIcon"]),
            "Map" => string_field(record, &["splash", "displayIcon"]),
            _ => string_field(record, &["displayIcon"]),
        }
        .unwrap_or_default();

        let mut attributes = BTreeMap::new();
        if category == "Agent" {
            if let Some(role) = record["role"]["displayName"].as_str() {
                attributes.insert("role".to_string(), role.into());
            }
        }
        if category == "Map" {
            attr_text(&mut attributes, "coordinates", record, "coordinates");
            attr_text(&mut attributes, "tactical_description", record, "tacticalDescription");
        }

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url,
            description: string_field(record, &["description"]),
            attributes,
            source_id: self.name().to_string(),
        })
    }
}
