//! PUBG item source (community items API on GitHub).
//!
//! The messiest upstream of the set: field casing varies per endpoint
//! (`id`/`name` vs `Key`/`Name`), numeric stats arrive as strings inside a
//! nested `details` object, and the ammo endpoint nests each item under an
//! `ammo` key with its compatible guns inlined beside it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::{AttrValue, Item};
use crate::config::SourceConfig;

use super::{
    attr_text, collection_values, string_field, synthesized_id, RawBatch, SourceAdapter,
    SourceClient, SourceError,
};

const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/pubgapi/v2/main";

const ENDPOINTS: &[(&str, &str)] = &[
    ("all", "Weapon"),
    ("ammo", "Ammo"),
    ("attachs", "Attachment"),
    ("body", "Equipment"),
    ("health", "Consumable"),
    ("maps", "Map"),
    ("vehicles", "Vehicle"),
];

pub struct PubgSource {
    client: SourceClient,
    base_url: String,
    precedence: u32,
}

impl PubgSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            client: SourceClient::new(config.timeout_secs),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            precedence: config.precedence,
        }
    }

    /// The ammo endpoint wraps each item as `{ammo: {...}, guns: [...]}`;
    /// unwrap to the inner object so it maps like any other record.
    fn flatten_ammo(records: Vec<Value>) -> Vec<Value> {
        records
            .into_iter()
            .map(|entry| match entry.get("ammo") {
                Some(ammo) => ammo.clone(),
                None => entry,
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for PubgSource {
    fn name(&self) -> &str {
        "pubg"
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        let fetches = ENDPOINTS.iter().map(|(path, category)| {
            let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
            async move {
                let body = self.client.get_json(&url).await?;
                let mut records = collection_values(body);
                if *category == "Ammo" {
                    records = Self::flatten_ammo(records);
                }
                Ok::<RawBatch, SourceError>(RawBatch {
                    category: (*category).to_string(),
                    records,
                })
            }
        });

        futures::future::try_join_all(fetches).await
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let name = string_field(record, &["name", "Key", "Name"])?;
        let id = string_field(record, &["id"]).unwrap_or_else(|| synthesized_id(&name));
        let image_url = string_field(record, &["image", "imageUrl", "Icon"]).unwrap_or_default();

        let mut attributes = BTreeMap::new();
        match category {
            "Weapon" => {
                attr_text(&mut attributes, "bullet_type", record, "bullet_type");
                attr_text(&mut attributes, "magazine", record, "with_mag");
                attr_text(&mut attributes, "fire_modes", record, "fire_modes");
                // Stats live in a nested details object, as strings.
                for (key, field) in [("damage", "damage"), ("bullet_speed", "bullet_speed")] {
                    if let Some(v) = record["details"][field].as_str() {
                        if !v.is_empty() {
                            attributes.insert(key.to_string(), AttrValue::Text(v.to_string()));
                        }
                    }
                }
            }
            "Ammo" => {
                // The item's own name doubles as the caliber. Compatible guns
                // arrive as a comma-separated `useon` list; kept as a flat
                // attribute rather than a relation.
                attributes.insert("caliber".to_string(), AttrValue::Text(name.clone()));
                if let Some(useon) = record["useon"].as_str() {
                    let weapons: Vec<&str> =
                        useon.split(',').map(str::trim).filter(|w| !w.is_empty()).collect();
                    if !weapons.is_empty() {
                        attributes.insert(
                            "compatible_weapons".to_string(),
                            AttrValue::Text(weapons.join(", ")),
                        );
                    }
                }
            }
            "Consumable" => {
                attr_text(&mut attributes, "heals", record, "heals");
                attr_text(&mut attributes, "capacity", record, "capacity");
                attr_text(&mut attributes, "cast_time", record, "cast_time");
            }
            "Equipment" => {
                attr_text(&mut attributes, "level", record, "level");
            }
            "Map" => {
                attr_text(&mut attributes, "size", record, "size");
            }
            "Vehicle" => {
                attr_text(&mut attributes, "seats", record, "seats");
                attr_text(&mut attributes, "speed", record, "speed");
            }
            _ => {}
        }

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url,
            description: string_field(record, &["description", "Desc", "short_des"]),
            attributes,
            source_id: self.name().to_string(),
        })
    }

    fn numeric_attributes(&self, category: &str) -> &'static [&'static str] {
        match category {
            "Weapon" => &["damage", "bullet_speed"],
            "Consumable" => &["capacity", "cast_time"],
            "Equipment" => &["level"],
            "Vehicle" => &["seats"],
            _ => &[],
        }
    }
}
