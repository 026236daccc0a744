//! JSON-LD image extraction
//!
//! Scans every `<script type="application/ld+json">` block in document
//! order. Blocks that are not valid JSON are skipped; the first block that
//! contains an image wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::ImageCandidate;

static JSONLD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type=["']application/ld\+json["'][^>]*>(.*?)</script>"#).unwrap()
});

/// Image declared in the page's JSON-LD structured data
pub fn find_jsonld_image(html: &str) -> Option<ImageCandidate> {
    for (index, cap) in JSONLD_BLOCK.captures_iter(html).enumerate() {
        let content = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if content.is_empty() {
            continue;
        }

        let json = match serde_json::from_str::<Value>(content) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!(block = index, error = %e, "skipping malformed JSON-LD block");
                continue;
            }
        };

        if let Some(image) = image_from_jsonld(&json) {
            return Some(ImageCandidate::Reference(image.to_string()));
        }
    }

    None
}

/// Search a JSON-LD value for an image reference.
///
/// Within one value:
/// 1. arrays are searched element by element
/// 2. `image` as a string
/// 3. `image` as an array: first element, or its `url` if it is an object
/// 4. `image` as an object: its `url`
/// 5. entries of `@graph`, in order
pub fn image_from_jsonld(value: &Value) -> Option<&str> {
    match value {
        Value::Array(items) => items.iter().find_map(image_from_jsonld),
        Value::Object(obj) => {
            let declared = match obj.get("image") {
                Some(Value::String(s)) => Some(s.as_str()),
                Some(Value::Array(images)) => match images.first() {
                    Some(Value::String(s)) => Some(s.as_str()),
                    Some(first) => url_field(first),
                    None => None,
                },
                Some(image @ Value::Object(_)) => url_field(image),
                _ => None,
            };

            declared.filter(|s| !s.is_empty()).or_else(|| match obj.get("@graph") {
                Some(Value::Array(graph)) => graph.iter().find_map(image_from_jsonld),
                _ => None,
            })
        }
        _ => None,
    }
}

fn url_field(value: &Value) -> Option<&str> {
    value.get("url").and_then(Value::as_str)
}
