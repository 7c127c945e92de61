//! Apex Legends source (static legends dataset on GitHub Pages).
//!
//! One endpoint, one category. Records come from a Mongo export, so ids
//! hide inside `_id.$oid` and images inside a `thumbnail` object.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Item;
use crate::config::SourceConfig;

use super::{
    attr_text, collection_values, string_field, synthesized_id, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://raddythebrand.github.io/apex-legends";

pub struct ApexSource {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl ApexSource {
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
impl SourceAdapter for ApexSource {
    fn name(&self) -> &str {
        "apex"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let url = format!("{}/data.json", self.base_url.trim_end_matches('/'));
        let body = self.client.get_json(&url).await?;
        Ok(vec![RawBatch {
            category: "Legend".to_string(),
            records: collection_values(body),
        }])
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let name = string_field(record, &["name", "nickname"])?;
        let id = record["_id"]["$oid"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| synthesized_id(&name));

        let image_url = record["thumbnail"]["default"]
            .as_str()
            .or_else(|| record["thumbnail"]["large"].as_str())
            .unwrap_or_default()
            .to_string();

        let mut attributes = BTreeMap::new();
        attr_text(&mut attributes, "class", record, "class");
        attr_text(&mut attributes, "home", record, "home");
        attr_text(&mut attributes, "age", record, "age");
        attr_text(&mut attributes, "quote", record, "quote");

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url,
            description: string_field(record, &["desc"]),
            attributes,
            source_id: self.name().to_string(),
        })
    }

    fn numeric_attributes(&self, category: &str) -> &'static [&'static str] {
        match category {
            "Legend" => &["age"],
            _ => &[],
        }
    }
}
