//! Mock source adapter for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::catalog::{AttrValue, Item};
use crate::source::{string_field, RawBatch, SourceAdapter, SourceError};

/// Mock implementation of the [`SourceAdapter`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable raw batches
/// - Inject one-shot or persistent failures
/// - Count fetch calls for re-entrancy assertions
/// - Simulate slow upstreams with an artificial delay
///
/// # Example
///
/// ```rust,ignore
/// use armory_core::testing::{fixtures, MockSource};
///
/// let source = MockSource::new("alpha")
///     .with_batch("Agent", vec![fixtures::record("jett", "Jett")]);
///
/// let batches = source.fetch().await?;
/// assert_eq!(batches[0].records.len(), 1);
/// assert_eq!(source.fetch_count(), 1);
/// ```
pub struct MockSource {
    name: String,
    precedence: u32,
    /// Batches returned by subsequent fetches.
    batches: Arc<RwLock<Vec<RawBatch>>>,
    /// If set, the next fetch fails with this error (consumed).
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// If set, every fetch fails with a connection error.
    always_fail: Arc<RwLock<Option<String>>>,
    /// Number of fetch calls made.
    fetch_count: Arc<AtomicUsize>,
    /// Artificial latency before each fetch resolves.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockSource {
    /// Create a new mock source with no batches.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            precedence: 0,
            batches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            always_fail: Arc::new(RwLock::new(None)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the dedupe precedence rank (builder style).
    pub fn with_precedence(mut self, precedence: u32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Add a batch of raw records under a category (builder style).
    pub fn with_batch(self, category: &str, records: Vec<Value>) -> Self {
        self.batches
            .try_write()
            .expect("builder used after sharing")
            .push(RawBatch {
                category: category.to_string(),
                records,
            });
        self
    }

    /// Make every fetch fail with a connection error (builder style).
    pub fn with_persistent_failure(self, message: &str) -> Self {
        *self
            .always_fail
            .try_write()
            .expect("builder used after sharing") = Some(message.to_string());
        self
    }

    /// Replace all batches.
    pub async fn set_batches(&self, batches: Vec<RawBatch>) {
        *self.batches.write().await = batches;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every subsequent fetch fail, or clear with `None`.
    pub async fn set_always_fail(&self, message: Option<String>) {
        *self.always_fail.write().await = message;
    }

    /// Delay each fetch by the given duration (for in-flight assertions).
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Number of fetch calls made so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn precedence(&self) -> u32 {
        self.precedence
    }

    async fn fetch(&self) -> Result<Vec<RawBatch>, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        if let Some(message) = self.always_fail.read().await.clone() {
            return Err(SourceError::ConnectionFailed(message));
        }

        Ok(self.batches.read().await.clone())
    }

    fn map_record(&self, category: &str, record: &Value) -> Option<Item> {
        let id = string_field(record, &["id"])?;
        let name = string_field(record, &["name"])?;

        let mut attributes = std::collections::BTreeMap::new();
        if let Some(object) = record.as_object() {
            for (key, value) in object {
                if matches!(key.as_str(), "id" | "name" | "image" | "description") {
                    continue;
                }
                let attr = match value {
                    Value::String(s) => AttrValue::Text(s.clone()),
                    Value::Number(n) => match n.as_f64() {
                        Some(f) => AttrValue::Number(f),
                        None => continue,
                    },
                    Value::Bool(b) => AttrValue::Flag(*b),
                    _ => continue,
                };
                attributes.insert(key.clone(), attr);
            }
        }

        Some(Item {
            id,
            name,
            category: category.to_string(),
            image_url: string_field(record, &["image"]).unwrap_or_default(),
            description: string_field(record, &["description"]),
            attributes,
            source_id: self.name.clone(),
        })
    }

    fn numeric_attributes(&self, _category: &str) -> &'static [&'static str] {
        &["damage", "level"]
    }
}
