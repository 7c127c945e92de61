//! Normalization of raw source records into catalog items.
//!
//! Applies the owning adapter's mapping function, fills image fallbacks, and
//! coerces string-typed numeric attributes. Records the adapter cannot map
//! are dropped per item and counted, never raised as errors.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::catalog::{placeholder_image, AttrValue, Item};
use crate::source::{RawBatch, SourceAdapter};

/// One batch after normalization: the mapped items plus how many records
/// were dropped as malformed.
#[derive(Debug)]
pub struct NormalizedBatch {
    pub category: String,
    pub items: Vec<Item>,
    pub dropped: usize,
}

/// Leading number inside a stat string, e.g. `"47"`, `"8sec"`, `"-12.5 m"`.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("invalid numeric pattern"));

/// Extract a number from a string-typed stat.
///
/// Sources routinely ship `"47"`, `"8sec"` or `"715 m/s"` where a number is
/// meant; the first numeric run wins. Returns `None` when no digits appear.
pub fn coerce_numeric(value: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Normalize one raw batch through its adapter's mapping.
///
/// - records the adapter maps to `None` are dropped and counted;
/// - mapped items without a usable name are dropped as well;
/// - empty image URLs are replaced with the category placeholder, so
///   consumers never need null-checks;
/// - attributes declared numeric by the adapter for this category are
///   coerced from text; a failed coercion removes the attribute rather
///   than failing the item.
pub fn normalize_batch(adapter: &dyn SourceAdapter, batch: &RawBatch) -> NormalizedBatch {
    let numeric_keys = adapter.numeric_attributes(&batch.category);
    let mut items = Vec::with_capacity(batch.records.len());
    let mut dropped = 0;

    for record in &batch.records {
        let Some(mut item) = adapter.map_record(&batch.category, record) else {
            dropped += 1;
            continue;
        };

        if item.name.trim().is_empty() || item.id.trim().is_empty() {
            dropped += 1;
            continue;
        }

        if item.image_url.is_empty() {
            item.image_url = placeholder_image(&batch.category);
        }

        for key in numeric_keys {
            coerce_attribute(&mut item, key);
        }

        items.push(item);
    }

    if dropped > 0 {
        debug!(
            source = adapter.name(),
            category = %batch.category,
            dropped = dropped,
            "Dropped malformed records"
        );
    }

    NormalizedBatch {
        category: batch.category.clone(),
        items,
        dropped,
    }
}

fn coerce_attribute(item: &mut Item, key: &str) {
    let coerced = match item.attributes.get(key) {
        Some(AttrValue::Text(text)) => coerce_numeric(text),
        _ => return,
    };
    match coerced {
        Some(n) => {
            item.attributes.insert(key.to_string(), AttrValue::Number(n));
        }
        None => {
            item.attributes.remove(key);
        }
    }
}
