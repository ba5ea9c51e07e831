//! Cart payload schema
//!
//! The storefront posts its cart as a JSON array inside a form field.
//! Items are loosely typed on the client side, so every field is kept as a
//! raw JSON value and coerced later by the checkout builder.

use serde::Deserialize;
use serde_json::Value;

/// Form body submitted by the storefront
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    /// JSON-encoded array of cart items
    #[serde(default)]
    pub items: Option<String>,
}

/// One cart entry as submitted
///
/// `None` means the key was absent, `Some(Value::Null)` means an explicit
/// `null`. The two coerce differently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartItem {
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub images: Option<Value>,
}

impl CartItem {
    /// Read a cart item out of an arbitrary JSON value
    ///
    /// Non-object entries yield an item with every field absent.
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").cloned(),
            price: value.get("price").cloned(),
            quantity: value.get("quantity").cloned(),
            images: value.get("images").cloned(),
        }
    }

    /// Trimmed display name, if the item carries a non-blank string name
    pub fn display_name(&self) -> Option<&str> {
        match &self.name {
            Some(Value::String(name)) => {
                let trimmed = name.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Non-empty string image URLs
    pub fn image_urls(&self) -> Vec<String> {
        match &self.images {
            Some(Value::Array(images)) => images
                .iter()
                .filter_map(|image| image.as_str())
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}
