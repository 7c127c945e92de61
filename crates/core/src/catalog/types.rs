//! Types for the unified item catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel category that matches every item in queries.
pub const ALL_CATEGORIES: &str = "All";

/// A single scalar attribute value.
///
/// Source schemas vary per category and per source, so category-specific
/// fields (damage, rarity, team, float range, ...) are carried as a loosely
/// typed bag of scalars rather than as first-class fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl AttrValue {
    /// The numeric value, if this attribute is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text value, if this attribute is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

/// The unified catalog entity.
///
/// One `Item` per `(category, id)` pair after a completed aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity, derived from the source's native identifier
    /// (or synthesized from the name when the source has none).
    pub id: String,
    /// Required display name.
    pub name: String,
    /// Closed tag assigned by the adapter (e.g. "Agent", "Weapon", "Map").
    pub category: String,
    /// Primary display image. Always a usable URL: sources without images
    /// get a placeholder so renderers never need null-checks.
    pub image_url: String,
    /// Longer description, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category-specific scalar fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,
    /// Which adapter produced this item. Used for dedupe tie-breaking and
    /// debugging, never shown to end users.
    pub source_id: String,
}

impl Item {
    /// The `(category, id)` identity used for deduplication.
    pub fn key(&self) -> ItemKey {
        (self.category.clone(), self.id.clone())
    }
}

/// Deduplication key: `(category, id)`.
pub type ItemKey = (String, String);

/// Placeholder image for items whose source provides no usable image.
pub fn placeholder_image(category: &str) -> String {
    format!(
        "https://placehold.co/400x400/1a1a1a/666666?text={}",
        urlencoding::encode(&format!("No {}", category))
    )
}
