//! Catalogue item model and response normalization.

use crate::error::{FoodyError, Result};
use serde_json::{Map, Number, Value};

/// One food item as displayed in the catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    /// Trimmed identifier, empty when the payload carried none
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub text: String,
    /// Image URL or path relative to the catalogue base URL
    pub image: String,
    /// Price in dollars
    pub price: f64,
    /// Category, e.g. "Breakfast"
    pub kind: String,
}

impl Item {
    /// Build an item from one element of the catalogue response.
    ///
    /// # Returns
    /// * `Option<Item>` - `None` when the element is not a JSON object
    ///
    /// # Details
    /// The identifier is the first non-empty of `id` and `_id`; strings are
    /// trimmed and numbers are stringified. Missing text fields become empty
    /// strings and a missing or non-numeric price becomes 0.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;

        let id = ["id", "_id"]
            .iter()
            .filter_map(|key| identifier(fields.get(*key)?))
            .next()
            .unwrap_or_default();

        Some(Self {
            id,
            name: text_field(fields, "name"),
            text: text_field(fields, "text"),
            image: text_field(fields, "image"),
            price: fields.get("price").and_then(number).unwrap_or(0.0),
            kind: text_field(fields, "type"),
        })
    }

    /// Whether ratings can be submitted for this item.
    pub fn has_identifier(&self) -> bool {
        crate::ratings::normalize_key(&self.id).is_some()
    }

    /// Absolute image URL.
    ///
    /// # Details
    /// Images starting with `http` are used verbatim, anything else is a path
    /// appended to `base_url`.
    pub fn image_url(&self, base_url: &str) -> String {
        resolve_image(base_url, &self.image)
    }

    /// Price label, e.g. `$12.00`.
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Resolve an item image against the catalogue base URL.
pub fn resolve_image(base_url: &str, image: &str) -> String {
    if image.starts_with("http") {
        return image.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if image.starts_with('/') {
        format!("{}{}", base, image)
    } else {
        format!("{}/{}", base, image)
    }
}

/// Parse a catalogue response body into normalized items.
///
/// # Returns
/// * `Result<Vec<Item>>` - Items in response order, or `Decode` when the body
///   is not a JSON array
///
/// # Details
/// Array elements that are not objects are skipped with a warning.
pub fn parse_items(body: &str) -> Result<Vec<Item>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FoodyError::Decode(e.to_string()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => {
            return Err(FoodyError::Decode(format!(
                "expected an array of items, got {}",
                kind_name(&other)
            )));
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match Item::from_json(entry) {
            Some(item) => items.push(item),
            None => tracing::warn!(index, "skipping catalogue entry that is not an object"),
        }
    }
    Ok(items)
}

fn identifier(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_text(n),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

/// Integral numbers print without a fractional part, so `1.0` and `1` give
/// the same key.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        _ => String::new(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_prefers_id_then_mongo_id() {
        let item = Item::from_json(&json!({"id": " 12 ", "_id": "abc"})).unwrap();
        assert_eq!(item.id, "12");

        let item = Item::from_json(&json!({"id": "", "_id": "abc"})).unwrap();
        assert_eq!(item.id, "abc");

        let item = Item::from_json(&json!({"_id": 7})).unwrap();
        assert_eq!(item.id, "7");
    }

    #[test]
    fn test_float_identifier_matches_integer_key() {
        let item = Item::from_json(&json!({"id": 1.0})).unwrap();
        assert_eq!(item.id, "1");

        let item = Item::from_json(&json!({"id": 2.5})).unwrap();
        assert_eq!(item.id, "2.5");

        let item = Item::from_json(&json!({"id": -3})).unwrap();
        assert_eq!(item.id, "-3");
    }

    #[test]
    fn test_missing_identifier_still_builds_item() {
        let item = Item::from_json(&json!({"name": "Soup", "type": "Lunch"})).unwrap();
        assert_eq!(item.id, "");
        assert_eq!(item.name, "Soup");
        assert!(!item.has_identifier());
    }

    #[test]
    fn test_fields_are_defensive() {
        let item = Item::from_json(&json!({
            "id": 1,
            "name": null,
            "price": "12.5",
            "type": "Dinner"
        }))
        .unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.price, 12.5);
        assert_eq!(item.kind, "Dinner");
        assert_eq!(item.price_label(), "$12.50");
    }

    #[test]
    fn test_resolve_image() {
        assert_eq!(
            resolve_image("http://localhost:9000", "https://cdn.example/a.png"),
            "https://cdn.example/a.png"
        );
        assert_eq!(
            resolve_image("http://localhost:9000", "/images/egg.png"),
            "http://localhost:9000/images/egg.png"
        );
        assert_eq!(
            resolve_image("http://localhost:9000/", "images/egg.png"),
            "http://localhost:9000/images/egg.png"
        );
    }

    #[test]
    fn test_parse_items() {
        let body = r#"[
            {"id": "1", "name": "Soup", "type": "Lunch", "price": 5},
            "garbage",
            {"_id": "2", "name": "Steak", "type": "Dinner", "price": 25}
        ]"#;
        let items = parse_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].price_label(), "$25.00");
    }

    #[test]
    fn test_parse_items_rejects_non_arrays() {
        assert!(matches!(parse_items(r#"{"id": 1}"#), Err(FoodyError::Decode(_))));
        assert!(matches!(parse_items("<html>"), Err(FoodyError::Decode(_))));
        assert!(parse_items("null").unwrap().is_empty());
    }
}
