//! Stripe Checkout schema definitions
//!
//! Request structures for `POST /v1/checkout/sessions` and the parts of the
//! response this service reads. Stripe takes form-encoded bodies with
//! bracketed keys, so requests are flattened by `to_form_params`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Checkout mode; the storefront only takes one-off payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Product shown on the hosted checkout page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Inline price for a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    /// Three-letter ISO currency code, lowercase
    pub currency: String,
    pub product_data: ProductData,
    /// Amount in minor currency units
    pub unit_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub price_data: PriceData,
    pub quantity: u64,
}

/// Body of a create-session call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSessionRequest {
    pub mode: CheckoutMode,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl CheckoutSessionRequest {
    /// Flatten into Stripe's bracketed form parameters
    pub fn to_form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("mode".to_string(), self.mode.as_str().to_string())];

        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            let price = &item.price_data;
            params.push((
                format!("{}[price_data][currency]", prefix),
                price.currency.clone(),
            ));
            params.push((
                format!("{}[price_data][product_data][name]", prefix),
                price.product_data.name.clone(),
            ));
            for (j, image) in price.product_data.images.iter().enumerate() {
                params.push((
                    format!("{}[price_data][product_data][images][{}]", prefix, j),
                    image.clone(),
                ));
            }
            params.push((
                format!("{}[price_data][unit_amount]", prefix),
                price.unit_amount.to_string(),
            ));
            params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }

        params.push(("success_url".to_string(), self.success_url.clone()));
        params.push(("cancel_url".to_string(), self.cancel_url.clone()));
        if let Some(locale) = &self.locale {
            params.push(("locale".to_string(), locale.clone()));
        }

        params
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Created checkout session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout URL; absent once a session is complete or expired
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub livemode: Option<bool>,
}

/// Stripe error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}
