//! Cart validation and checkout session assembly
//!
//! Turns the raw `items` form field into Stripe line items and builds the
//! create-session request. Nothing here touches the network, so every
//! failure is reported before the provider is called.

use serde_json::Value;

use crate::error::ApiError;
use crate::schemas::cart::CartItem;
use crate::schemas::stripe::{
    CheckoutMode, CheckoutSessionRequest, LineItem, PriceData, ProductData,
};
use crate::utils::{round_half_up, to_number};

/// Currency for every line item
pub const CURRENCY: &str = "usd";

/// Locale forced on the hosted checkout page
pub const LOCALE: &str = "en";

/// Smallest accepted unit amount, in cents
pub const MIN_UNIT_AMOUNT: i64 = 50;

/// Path the provider sends the buyer to after paying.
/// `{CHECKOUT_SESSION_ID}` is substituted by Stripe, not by us.
pub const SUCCESS_PATH: &str = "/success?session_id={CHECKOUT_SESSION_ID}";

/// Path the provider sends the buyer to on cancel
pub const CANCEL_PATH: &str = "/cart";

/// Parse the `items` form field into cart items
pub fn parse_items(raw: Option<&str>) -> Result<Vec<CartItem>, ApiError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ApiError::MissingItems),
    };

    let value: Value = serde_json::from_str(raw).map_err(|_| ApiError::InvalidJson)?;

    match value {
        Value::Array(items) if !items.is_empty() => {
            Ok(items.iter().map(CartItem::from_value).collect())
        }
        _ => Err(ApiError::EmptyCart),
    }
}

/// Normalize one cart item at position `index` into a line item
pub fn build_line_item(index: usize, item: &CartItem) -> Result<LineItem, ApiError> {
    let name = item
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Item {}", index + 1));

    // Prices are already in cents
    let unit_amount = round_half_up(to_number(item.price.as_ref()));
    if !unit_amount.is_finite()
        || unit_amount < MIN_UNIT_AMOUNT as f64
        || unit_amount >= i64::MAX as f64
    {
        return Err(ApiError::InvalidPrice {
            name,
            min_cents: MIN_UNIT_AMOUNT,
        });
    }

    let quantity = match &item.quantity {
        None | Some(Value::Null) => 1,
        Some(value) => {
            let floored = to_number(Some(value)).floor();
            if floored.is_finite() {
                floored.max(1.0) as u64
            } else {
                1
            }
        }
    };

    Ok(LineItem {
        price_data: PriceData {
            currency: CURRENCY.to_string(),
            product_data: ProductData {
                name,
                images: item.image_urls(),
            },
            unit_amount: unit_amount as i64,
        },
        quantity,
    })
}

/// Validate the raw items field and build every line item
///
/// Items are checked in order and the first invalid one aborts the cart.
pub fn build_line_items(raw: Option<&str>) -> Result<Vec<LineItem>, ApiError> {
    parse_items(raw)?
        .iter()
        .enumerate()
        .map(|(i, item)| build_line_item(i, item))
        .collect()
}

/// Validate the configured site URL and strip trailing slashes
pub fn base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(ApiError::InvalidBaseUrl);
    }

    let base = trimmed.trim_end_matches('/');
    url::Url::parse(base).map_err(|_| ApiError::InvalidBaseUrl)?;

    Ok(base.to_string())
}

/// Redirect targets handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Build success and cancel URLs from a validated base
pub fn checkout_urls(base: &str) -> CheckoutUrls {
    CheckoutUrls {
        success_url: format!("{}{}", base, SUCCESS_PATH),
        cancel_url: format!("{}{}", base, CANCEL_PATH),
    }
}

/// Build the create-session request from the raw form field and site URL
pub fn build_session_request(
    raw_items: Option<&str>,
    site_url: &str,
) -> Result<CheckoutSessionRequest, ApiError> {
    let line_items = build_line_items(raw_items)?;
    let base = base_url(site_url)?;
    let urls = checkout_urls(&base);

    Ok(CheckoutSessionRequest {
        mode: CheckoutMode::Payment,
        line_items,
        success_url: urls.success_url,
        cancel_url: urls.cancel_url,
        locale: Some(LOCALE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://shop.test";

    #[test]
    fn test_single_item_example() {
        let items = build_line_items(Some(r#"[{"name":"Mug","price":1200,"quantity":2}]"#)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price_data.unit_amount, 1200);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price_data.currency, "usd");
        assert_eq!(items[0].price_data.product_data.name, "Mug");
    }

    #[test]
    fn test_price_below_minimum_fails() {
        let err = build_line_items(Some(r#"[{"price":10}]"#)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidPrice { ref name, .. } if name == "Item 1"));

        let err = build_line_items(Some(r#"[{"name":"Sticker","price":49}]"#)).unwrap_err();
        assert_eq!(err.to_string(), "Price for \"Sticker\" must be valid (>= 50 cents).");
    }

    #[test]
    fn test_price_boundary() {
        let items = build_line_items(Some(r#"[{"price":50}]"#)).unwrap();
        assert_eq!(items[0].price_data.unit_amount, 50);

        // 49.5 rounds up to 50
        let items = build_line_items(Some(r#"[{"price":49.5}]"#)).unwrap();
        assert_eq!(items[0].price_data.unit_amount, 50);

        assert!(build_line_items(Some(r#"[{"price":49.49}]"#)).is_err());
    }

    #[test]
    fn test_non_numeric_price_fails() {
        for raw in [
            r#"[{"name":"Mug","price":"twelve"}]"#,
            r#"[{"name":"Mug"}]"#,
            r#"[{"name":"Mug","price":{"cents":1200}}]"#,
            r#"[{"name":"Mug","price":null}]"#,
        ] {
            let err = build_line_items(Some(raw)).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidPrice { ref name, .. } if name == "Mug"),
                "{} should fail for Mug",
                raw
            );
        }
    }

    #[test]
    fn test_out_of_range_numbers_are_valid_json() {
        let err = build_line_items(Some(r#"[{"name":"Mug","price":1e400}]"#)).unwrap_err();
        assert_eq!(err.to_string(), "Price for \"Mug\" must be valid (>= 50 cents).");

        let items = build_line_items(Some(r#"[{"name":"Mug","price":1200,"quantity":1e400}]"#)).unwrap();
        assert_eq!(items[0].price_data.unit_amount, 1200);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_numeric_string_price_is_accepted() {
        let items = build_line_items(Some(r#"[{"name":"Mug","price":"1200"}]"#)).unwrap();
        assert_eq!(items[0].price_data.unit_amount, 1200);
    }

    #[test]
    fn test_quantity_coercion() {
        let cases = [
            (r#"[{"price":100}]"#, 1),
            (r#"[{"price":100,"quantity":null}]"#, 1),
            (r#"[{"price":100,"quantity":0}]"#, 1),
            (r#"[{"price":100,"quantity":-4}]"#, 1),
            (r#"[{"price":100,"quantity":2.9}]"#, 2),
            (r#"[{"price":100,"quantity":"3"}]"#, 3),
            (r#"[{"price":100,"quantity":"lots"}]"#, 1),
        ];
        for (raw, expected) in cases {
            let items = build_line_items(Some(raw)).unwrap();
            assert_eq!(items[0].quantity, expected, "{}", raw);
        }
    }

    #[test]
    fn test_name_fallback_uses_position() {
        let items = build_line_items(Some(
            r#"[{"name":"Mug","price":100},{"name":"  ","price":100},{"price":100}]"#,
        ))
        .unwrap();
        let names: Vec<_> = items
            .iter()
            .map(|i| i.price_data.product_data.name.as_str())
            .collect();
        assert_eq!(names, vec!["Mug", "Item 2", "Item 3"]);
    }

    #[test]
    fn test_first_invalid_item_aborts() {
        let err = build_line_items(Some(
            r#"[{"name":"Mug","price":1200},{"name":"Pin","price":5},{"name":"Cap","price":1}]"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidPrice { ref name, .. } if name == "Pin"));
    }

    #[test]
    fn test_items_field_errors() {
        assert!(matches!(build_line_items(None), Err(ApiError::MissingItems)));
        assert!(matches!(build_line_items(Some("")), Err(ApiError::MissingItems)));
        assert!(matches!(build_line_items(Some("[{")), Err(ApiError::InvalidJson)));
        assert!(matches!(build_line_items(Some("[]")), Err(ApiError::EmptyCart)));
        assert!(matches!(build_line_items(Some(r#"{"name":"Mug"}"#)), Err(ApiError::EmptyCart)));
        assert!(matches!(build_line_items(Some("42")), Err(ApiError::EmptyCart)));
    }

    #[test]
    fn test_every_line_item_is_in_range() {
        let raw = r#"[
            {"name":"A","price":50,"quantity":1},
            {"name":"B","price":"75.4","quantity":"0"},
            {"name":"C","price":[999],"quantity":-10},
            {"name":"D","price":1e6,"quantity":1e3}
        ]"#;
        for item in build_line_items(Some(raw)).unwrap() {
            assert!(item.price_data.unit_amount >= MIN_UNIT_AMOUNT);
            assert!(item.quantity >= 1);
        }
    }

    #[test]
    fn test_base_url_validation() {
        assert_eq!(base_url("https://shop.test").unwrap(), "https://shop.test");
        assert_eq!(base_url("  http://localhost:4321/// ").unwrap(), "http://localhost:4321");
        assert_eq!(base_url("HTTPS://Shop.test/").unwrap(), "HTTPS://Shop.test");

        assert!(matches!(base_url(""), Err(ApiError::InvalidBaseUrl)));
        assert!(matches!(base_url("shop.test"), Err(ApiError::InvalidBaseUrl)));
        assert!(matches!(base_url("ftp://shop.test"), Err(ApiError::InvalidBaseUrl)));
        assert!(matches!(base_url("https://"), Err(ApiError::InvalidBaseUrl)));
    }

    #[test]
    fn test_checkout_urls() {
        let urls = checkout_urls("https://shop.test");
        assert_eq!(
            urls.success_url,
            "https://shop.test/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url, "https://shop.test/cart");
    }

    #[test]
    fn test_build_session_request() {
        let request = build_session_request(
            Some(r#"[{"name":"Mug","price":1200,"quantity":2,"images":["https://cdn.test/mug.png",""]}]"#),
            "https://shop.test/",
        )
        .unwrap();

        assert_eq!(request.mode, CheckoutMode::Payment);
        assert_eq!(request.locale.as_deref(), Some("en"));
        assert_eq!(request.cancel_url, "https://shop.test/cart");
        assert_eq!(
            request.line_items[0].price_data.product_data.images,
            vec!["https://cdn.test/mug.png".to_string()]
        );
    }

    #[test]
    fn test_items_are_checked_before_base_url() {
        let err = build_session_request(Some("[]"), "not-a-url").unwrap_err();
        assert!(matches!(err, ApiError::EmptyCart));

        let err = build_session_request(Some(r#"[{"price":100}]"#), "not-a-url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl));

        assert!(build_session_request(Some(r#"[{"price":100}]"#), SITE).is_ok());
    }
}
