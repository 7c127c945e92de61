//! Test doubles and fixtures for the aggregation core.

mod mock_source;

pub use mock_source::MockSource;

/// Canned records and items for tests.
pub mod fixtures {
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    use crate::catalog::Item;

    /// A raw record with just an id and a name (no image).
    pub fn record(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name})
    }

    /// A raw record with an id, name and image URL.
    pub fn record_with_image(id: &str, name: &str, image: &str) -> Value {
        json!({"id": id, "name": name, "image": image})
    }

    /// A normalized item attributed to a "test" source.
    pub fn item(category: &str, id: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            image_url: format!("https://example.com/{}.png", id),
            description: None,
            attributes: BTreeMap::new(),
            source_id: "test".to_string(),
        }
    }
}
