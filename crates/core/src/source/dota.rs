//! Dota 2 hero source (OpenDota herostats).
//!
//! A single endpoint returning every hero with its stats. Hero ids are
//! numeric and image paths are relative to the Dota CDN.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::{AttrValue, Item};
use crate::config::SourceConfig;

use super::{
    attr_number, attr_text, collection_values, string_field, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";

const DOTA_CDN_BASE_URL: &str = "https://cdn.dota2.com";

pub struct DotaSource {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl DotaSource {
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
impl SourceAdapter for DotaSource {
    fn name(&self) -> &str {
        "dota"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let url = format!("{}/herostats", self.base_url.trim_end_matches('/'));
        let body = self.client.get_json(&url).await?;
        Ok(vec![RawBatch {
            category: "Hero".to_string(),
            records: collection_values(body),
        }])
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let id = string_field(record, &["id"])?;
        let name = string_field(record, &["localized_name"])?;

        let image_url = match record["img"].as_str() {
            Some(img) if img.starts_with("http") => img.to_string(),
            Some(img) => format!("{}{}", DOTA_CDN_BASE_URL, img),
            None => String::new(),
        };

        let mut attributes = BTreeMap::new();
        attr_text(&mut attributes, "primary_attr", record, "primary_attr");
        attr_text(&mut attributes, "attack_type", record, "attack_type");
        if let Some(roles) = record["roles"].as_array() {
            let roles: Vec<&str> = roles.iter().filter_map(|r| r.as_str()).collect();
            if !roles.is_empty() {
                attributes.insert("roles".to_string(), AttrValue::Text(roles.join(", ")));
            }
        }
        attr_number(&mut attributes, "base_health", record, "base_health");
        attr_number(&mut attributes, "base_armor", record, "base_armor");
        attr_number(&mut attributes, "base_attack_max", record, "base_attack_max");
        attr_number(&mut attributes, "move_speed", record, "move_speed");

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url,
            description: None,
            attributes,
            source_id: self.name().to_string(),
        })
    }
}
