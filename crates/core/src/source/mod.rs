//! Source adapters: one per upstream game-data API.
//!
//! An adapter knows its source's URLs, the raw shape each endpoint returns,
//! and how to map a raw record into the unified [`Item`](crate::catalog::Item)
//! model. Adapters fail independently: a network or parse failure surfaces as
//! a [`SourceUnavailable`] for that source only and never aborts siblings.

mod apex;
mod cs2;
mod dota;
mod fortnite;
mod pubg;
mod rivals;
mod valorant;

pub use apex::ApexSource;
pub use cs2::Cs2Source;
pub use dota::DotaSource;
pub use fortnite::FortniteSource;
pub use pubg::PubgSource;
pub use rivals::RivalsSource;
pub use valorant::ValorantSource;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{AttrValue, Item};

/// One endpoint's worth of raw records, tagged with the category label the
/// adapter assigns to that endpoint.
#[derive(Debug, Clone)]
pub struct RawBatch {
    pub category: String,
    pub records: Vec<Value>,
}

/// Errors from a single source fetch.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    ParseError(String),

    #[error("request timeout")]
    Timeout,

    #[error("source not configured: {0}")]
    NotConfigured(String),
}

/// A source's failure during an aggregation pass, carrying the source name
/// and the underlying cause. Recovered locally by the orchestrator.
#[derive(Debug, Error)]
#[error("source '{name}' unavailable: {cause}")]
pub struct SourceUnavailable {
    pub name: String,
    #[source]
    pub cause: SourceError,
}

/// Trait for upstream game-data sources.
///
/// `fetch` produces a finite set of raw batches and is not restartable; the
/// orchestrator issues a fresh call per refresh pass.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Source name for config, dedupe attribution and logging.
    fn name(&self) -> &str;

    /// Dedupe precedence rank. Higher ranks win `(category, id)` collisions;
    /// the default leaves first-seen-wins behavior.
    fn precedence(&self) -> u32 {
        0
    }

    /// Fetch all endpoints of this source and return their raw records.
    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError>;

    /// Map one raw record into an [`Item`], or `None` to drop it as
    /// malformed. The category is the batch's label.
    fn map_record(&self, category: &str, record: &Value) -> Option<Item>;

    /// Attribute keys that are numeric in this category's schema. String
    /// values under these keys are coerced to numbers during normalization.
    fn numeric_attributes(&self, _category: &str) -> &'static [&'static str] {
        &[]
    }
}

/// Shared HTTP client for source adapters.
///
/// Wraps reqwest with the per-source timeout and maps transport, status and
/// decode failures onto [`SourceError`].
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    pub fn new(timeout_secs: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// GET a JSON document.
    pub async fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        self.get_json_inner(url, None).await
    }

    /// GET a JSON document with an API key header (e.g. `x-api-key`).
    pub async fn get_json_with_key(
        &self,
        url: &str,
        header: &str,
        key: &str,
    ) -> Result<Value, SourceError> {
        self.get_json_inner(url, Some((header, key))).await
    }

    async fn get_json_inner(
        &self,
        url: &str,
        api_key: Option<(&str, &str)>,
    ) -> Result<Value, SourceError> {
        debug!(url = url, "Fetching source endpoint");

        let mut request = self.client.get(url);
        if let Some((header, key)) = api_key {
            request = request.header(header, key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else if e.is_connect() {
                SourceError::ConnectionFailed(e.to_string())
            } else {
                SourceError::ApiError {
                    status: 0,
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))
    }
}

/// Extract the item collection from a response body: either a top-level
/// array or an object whose values form the collection.
pub fn collection_values(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(map) => map.into_values().collect(),
        _ => Vec::new(),
    }
}

/// Unwrap `{status, data}` response envelopes, returning the inner payload.
/// Bodies without a `data` key pass through unchanged.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// First non-empty string (or number, stringified) among the given keys.
/// Sources disagree on field casing, so adapters probe several candidates.
pub fn string_field(record: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match record.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Deterministic identity for records whose source has no native id:
/// a slug of the display name, so repeated passes synthesize the same id.
pub fn synthesized_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

/// Insert a text attribute if the record carries a non-empty string field.
pub fn attr_text(attrs: &mut BTreeMap<String, AttrValue>, key: &str, record: &Value, field: &str) {
    if let Some(Value::String(s)) = record.get(field) {
        if !s.is_empty() {
            attrs.insert(key.to_string(), AttrValue::Text(s.clone()));
        }
    }
}

/// Insert a numeric attribute if the record carries a number field. String
/// values are kept as text here; the normalizer coerces declared numerics.
pub fn attr_number(
    attrs: &mut BTreeMap<String, AttrValue>,
    key: &str,
    record: &Value,
    field: &str,
) {
    match record.get(field) {
        Some(Value::Number(n)) => {
            if let Some(f) = n.as_f64() {
                attrs.insert(key.to_string(), AttrValue::Number(f));
            }
        }
        Some(Value::String(s)) if !s.is_empty() => {
            attrs.insert(key.to_string(), AttrValue::Text(s.clone()));
        }
        _ => {}
    }
}

/// Insert a boolean attribute if the record carries a bool field.
pub fn attr_flag(attrs: &mut BTreeMap<String, AttrValue>, key: &str, record: &Value, field: &str) {
    if let Some(Value::Bool(b)) = record.get(field) {
        attrs.insert(key.to_string(), AttrValue::Flag(*b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_values_from_array() {
        let values = collection_values(json!([{"a": 1}, {"b": 2}]));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_collection_values_from_object() {
        let values = collection_values(json!({"x": {"a": 1}, "y": {"b": 2}}));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_collection_values_from_scalar_is_empty() {
        assert!(collection_values(json!("nope")).is_empty());
        assert!(collection_values(json!(null)).is_empty());
    }

    #[test]
    fn test_unwrap_envelope() {
        let data = unwrap_envelope(json!({"status": 200, "data": [{"id": "x"}]}));
        assert!(data.is_array());

        let passthrough = unwrap_envelope(json!([{"id": "x"}]));
        assert!(passthrough.is_array());

        let no_data = unwrap_envelope(json!({"id": "x"}));
        assert_eq!(no_data["id"], "x");
    }

    #[test]
    fn test_string_field_probes_keys_in_order() {
        let record = json!({"Key": "AKM", "Name": "AKM Rifle"});
        assert_eq!(
            string_field(&record, &["id", "name", "Key", "Name"]),
            Some("AKM".to_string())
        );
    }

    #[test]
    fn test_string_field_stringifies_numbers() {
        let record = json!({"id": 14});
        assert_eq!(string_field(&record, &["id"]), Some("14".to_string()));
    }

    #[test]
    fn test_string_field_skips_empty() {
        let record = json!({"id": "", "name": "Pochinki"});
        assert_eq!(string_field(&record, &["id", "name"]), Some("Pochinki".to_string()));
        assert_eq!(string_field(&record, &["id"]), None);
    }

    #[test]
    fn test_synthesized_id_is_stable_slug() {
        assert_eq!(synthesized_id("Red Dot Sight"), "red-dot-sight");
        assert_eq!(synthesized_id("AKM"), "akm");
        assert_eq!(synthesized_id("M416 (Custom)"), "m416-custom");
    }

    #[test]
    fn test_attr_helpers() {
        let record = json!({"role": "Duelist", "level": 3, "heals": "60%", "souvenir": true, "empty": ""});
        let mut attrs = BTreeMap::new();

        attr_text(&mut attrs, "role", &record, "role");
        attr_text(&mut attrs, "empty", &record, "empty");
        attr_number(&mut attrs, "level", &record, "level");
        attr_number(&mut attrs, "heals", &record, "heals");
        attr_flag(&mut attrs, "souvenir", &record, "souvenir");

        assert_eq!(attrs["role"], AttrValue::Text("Duelist".into()));
        assert_eq!(attrs["level"], AttrValue::Number(3.0));
        // String-typed numerics stay text until normalization coerces them.
        assert_eq!(attrs["heals"], AttrValue::Text("60%".into()));
        assert_eq!(attrs["souvenir"], AttrValue::Flag(true));
        assert!(!attrs.contains_key("empty"));
    }
}
