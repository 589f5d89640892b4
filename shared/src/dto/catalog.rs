//! # Catalog Data Transfer Objects
//!
//! Product records as served by the scraper-backed catalog service.

use serde::{Deserialize, Deserializer, Serialize};

/// A single product card.
///
/// Every field is optional on the wire. The scraper emits `price` as a
/// formatted string most of the time but numeric prices and numeric ids do
/// show up, so both are accepted and kept as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Product {
    /// Identity key used to tell cards apart: `id`, else `url`.
    pub fn key(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.url.as_deref().filter(|url| !url.is_empty()))
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "Untitled product",
        }
    }

    pub fn display_price(&self) -> &str {
        match self.price.as_deref() {
            Some(price) if !price.is_empty() => price,
            _ => "Price unavailable",
        }
    }

    /// Outbound link, only when the product carries a non-empty url.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Normalize a `GET /products` body into a product list.
///
/// Non-array bodies become an empty collection. Array elements that are not
/// product-shaped objects are skipped.
pub fn products_from_value(value: serde_json::Value) -> Vec<Product> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
