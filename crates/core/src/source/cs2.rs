//! CS2 item source (ByMykel's CSGO-API JSON dumps).
//!
//! Static JSON files served from GitHub; some endpoints are arrays, others
//! keyed objects. Image paths are sometimes relative Steam economy paths.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Item;
use crate::config::SourceConfig;

use super::{
    attr_flag, attr_number, attr_text, collection_values, string_field, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/ByMykel/CSGO-API/main/public/api/en";

/// Relative image paths resolve against the Steam economy CDN.
const STEAM_IMAGE_CDN: &str = "https://community.akamai.steamstatic.com/economy/image/";

const ENDPOINTS: &[(&str, &str)] = &[
    ("agents.json", "Agent"),
    ("skins.json", "Skin"),
    ("stickers.json", "Sticker"),
    ("keychains.json", "Keychain"),
    ("collections.json", "Collection"),
    ("crates.json", "Crate"),
    ("keys.json", "Key"),
    ("collectibles.json", "Collectible"),
];

pub struct Cs2Source {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl Cs2Source {
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
impl SourceAdapter for Cs2Source {
    fn name(&self) -> &str {
        "cs2"
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
                    records: collection_values(body),
                })
            }
        });

        futures::future::try_join_all(fetches).await
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let id = string_field(record, &["id"])?;
        let name = string_field(record, &["name"])?;

        let image_url = match string_field(record, &["image"]) {
            Some(image) if image.starts_with("http") => image,
            Some(image) => format!("{}{}", STEAM_IMAGE_CDN, image),
            None => String::new(),
        };

        let mut attributes = BTreeMap::new();
        if let Some(rarity) = record["rarity"]["name"].as_str() {
            attributes.insert("rarity".to_string(), rarity.into());
        }
        if let Some(color) = record["rarity"]["color"].as_str() {
            attributes.insert("rarity_color".to_string(), color.into());
        }
        if let Some(team) = record["team"]["name"].as_str() {
            attributes.insert("team".to_string(), team.into());
        }
        if let Some(weapon) = record["weapon"]["name"].as_str() {
            attributes.insert("weapon".to_string(), weapon.into());
        }
        if let Some(pattern) = record["pattern"]["name"].as_str() {
            attributes.insert("pattern".to_string(), pattern.into());
        }
        attr_text(&mut attributes, "market_hash_name", record, "market_hash_name");
        attr_number(&mut attributes, "min_float", record, "min_float");
        attr_number(&mut attributes, "max_float", record, "max_float");
        attr_flag(&mut attributes, "souvenir", record, "souvenir");
        attr_flag(&mut attributes, "stattrak", record, "stattrak");

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

    fn numeric_attributes(&self, category: &str) -> &'static [&'static str] {
        match category {
            "Skin" => &["min_float", "max_float"],
            _ => &[],
        }
    }
}
