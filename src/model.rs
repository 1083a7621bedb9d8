//! Catalog domain model
//!
//! Wire shapes for the three catalog resources and the payloads sent on
//! create/update. Field names follow the API's camelCase JSON; nested joined
//! data (`Products`, `Category`, `Colors`) is optional on decode.

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of photos attached to a product
pub const MAX_PRODUCT_PHOTOS: usize = 4;

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reference to a stored image (URL or server path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Present on rows from the joined `/all` view
    #[serde(
        rename = "Products",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub category_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<ImageRef>,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    #[serde(
        rename = "Colors",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub colors: Vec<Color>,
}

/// Parent category as embedded in a product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub hex_code: Option<String>,
    pub product_id: i64,
    #[serde(default)]
    pub photo: Option<ImageRef>,
}

// =========================================================================
// Payloads (full-record create/replace bodies)
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub sub_name: String,
    pub description: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    pub name: String,
    pub hex_code: Option<String>,
    pub product_id: i64,
}

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("Name"));
    }
    Ok(())
}

impl CategoryPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}

impl ProductPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)?;
        if self.category_id <= 0 {
            return Err(ValidationError::required("Category"));
        }
        Ok(())
    }
}

impl ColorPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)?;
        if self.product_id <= 0 {
            return Err(ValidationError::required("Product"));
        }
        if let Some(hex) = &self.hex_code {
            if !is_hex_color(hex) {
                return Err(ValidationError::new("Hex code must match #RRGGBB"));
            }
        }
        Ok(())
    }
}

/// `#RRGGBB` with case-insensitive hex digits
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

// =========================================================================
// List filters
// =========================================================================

/// Server-side list filter: field -> value, sent as a query string.
/// An empty filter means "return all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListFilter(BTreeMap<String, String>);

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(field: &str, value: impl ToString) -> Self {
        Self::new().with(field, value)
    }

    pub fn with(mut self, field: &str, value: impl ToString) -> Self {
        self.0.insert(field.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_joined_category() {
        let value = json!({
            "id": 1,
            "name": "Shoes",
            "Products": [
                {"id": 10, "name": "Runner", "subName": "X", "description": "", "categoryId": 1, "photos": null}
            ]
        });
        let category: Category = serde_json::from_value(value).unwrap();
        assert_eq!(category.products.len(), 1);
        assert!(category.products[0].photos.is_empty());
    }

    #[test]
    fn test_decode_bare_product() {
        let value = json!({"id": 2, "name": "Cap", "categoryId": 3});
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.sub_name, "");
        assert!(product.category.is_none());
        assert!(product.colors.is_empty());
    }

    #[test]
    fn test_product_payload_is_camel_case() {
        let payload = ProductPayload {
            name: "Cap".into(),
            sub_name: "Wool".into(),
            description: "Warm".into(),
            category_id: 3,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["subName"], "Wool");
        assert_eq!(value["categoryId"], 3);
    }

    #[test]
    fn test_payload_validation() {
        assert!(CategoryPayload { name: "  ".into() }.validate().is_err());
        assert!(CategoryPayload { name: "Hats".into() }.validate().is_ok());

        let product = ProductPayload {
            name: "Cap".into(),
            sub_name: String::new(),
            description: String::new(),
            category_id: 0,
        };
        assert_eq!(
            product.validate().unwrap_err().message(),
            "Category is required"
        );

        let color = ColorPayload {
            name: "Red".into(),
            hex_code: Some("#GG0000".into()),
            product_id: 1,
        };
        assert!(color.validate().is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#ff00AA"));
        assert!(!is_hex_color("ff00aa"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("#ff00aa0"));
    }

    #[test]
    fn test_list_filter_is_ordered() {
        let filter = ListFilter::by("productId", 7).with("categoryId", 2);
        assert_eq!(filter.to_string(), "categoryId=2,productId=7");
        assert_eq!(filter.get("productId"), Some("7"));
        assert!(ListFilter::new().is_empty());
    }
}
