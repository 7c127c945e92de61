//! Fortnite content source (fortnite-api.com).
//!
//! Endpoints wrap payloads in `{status, data}` envelopes; BR cosmetics sit
//! one level deeper under `data.br`, and map POIs under `data.pois`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Item;
use crate::config::SourceConfig;

use super::{
    attr_text, collection_values, string_field, unwrap_envelope, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://fortnite-api.com";

pub struct FortniteSource {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl FortniteSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            client: SourceClient::new(config.timeout_secs),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            precedence: config.precedence,
        }
    }

    async fn fetch_endpoint(
        &self,
        path: &str,
        category: &str,
        nested_key: Option<&str>,
    ) -> Result<RawBatch, SourceError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut data = unwrap_envelope(self.client.get_json(&url).await?);
        if let Some(key) = nested_key {
            data = data
                .get_mut(key)
                .map(Value::take)
                .unwrap_or(Value::Array(Vec::new()));
        }
        Ok(RawBatch {
            category: category.to_string(),
            records: collection_values(data),
        })
    }
}

#[async_trait]
impl SourceAdapter for FortniteSource {
    fn name(&self) -> &str {
        "fortnite"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let (banners, cosmetics, pois) = futures::future::try_join3(
            self.fetch_endpoint("/v1/banners", "Banner", None),
            self.fetch_endpoint("/v2/cosmetics", "Cosmetic", Some("br")),
            self.fetch_endpoint("/v1/map", "Map", Some("pois")),
        )
        .await?;

        Ok(vec![banners, cosmetics, pois])
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let id = string_field(record, &["id"])?;
        let name = string_field(record, &["name", "devName"])?;

        let image_url = record["images"]["icon"]
            .as_str()
            .or_else(|| record["images"]["smallIcon"].as_str())
            .unwrap_or_default()
            .to_string();

        let mut attributes = BTreeMap::new();
        if let Some(rarity) = record["rarity"]["displayValue"].as_str() {
            attributes.insert("rarity".to_string(), rarity.into());
        }
        if let Some(kind) = record["type"]["displayValue"].as_str() {
            attributes.insert("type".to_string(), kind.into());
        }
        attr_text(&mut attributes, "banner_category", record, "category");
        if category == "Map" {
            if let Some(x) = record["location"]["x"].as_f64() {
                attributes.insert("location_x".to_string(), x.into());
            }
            if let Some(y) = record["location"]["y"].as_f64() {
                attributes.insert("location_y".to_string(), y.into());
            }
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
