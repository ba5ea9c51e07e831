//! Loose numeric coercion
//!
//! Storefront carts are built in the browser, where prices and quantities
//! may arrive as numbers, numeric strings, booleans or `null`. These helpers
//! coerce such values the way a browser `Number()` call would, so the cart
//! behaves identically on both sides.

use serde_json::Value;

/// Coerce an optional JSON value to a number with `Number()` semantics
///
/// `None` stands for an absent key (`undefined`) and yields NaN.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(value) => value_to_number(value),
    }
}

fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        // Parsed from the literal text so out-of-range numbers become Infinity
        Value::Number(n) => parse_numeric_str(&n.to_string()),
        Value::String(s) => parse_numeric_str(s),
        // Arrays go through their string form: [] is "", [x] is String(x),
        // and a nested array stringifies the same way as its parent
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Object(_)] => f64::NAN,
            [Value::Null] => 0.0,
            [Value::String(s)] => parse_numeric_str(s),
            [Value::Bool(_)] => f64::NAN,
            [single] => value_to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Parse a string the way `Number("...")` does
pub fn parse_numeric_str(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let lower = s.get(..2).map(str::to_ascii_lowercase);
    let radix = match lower.as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    // Only digits, sign, point and exponent are allowed; this also rules out
    // the "inf" and "nan" spellings Rust accepts but browsers don't
    if s.chars().any(|c| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))) {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
        .unwrap_or(f64::NAN)
}

/// Round half toward positive infinity, like `Math.round`
pub fn round_half_up(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(value: Value) -> f64 {
        to_number(Some(&value))
    }

    #[test]
    fn test_plain_values() {
        assert_eq!(num(json!(1200)), 1200.0);
        assert_eq!(num(json!(12.5)), 12.5);
        assert_eq!(num(json!(null)), 0.0);
        assert_eq!(num(json!(true)), 1.0);
        assert_eq!(num(json!(false)), 0.0);
        assert!(to_number(None).is_nan());
        assert!(num(json!({"amount": 5})).is_nan());
    }

    #[test]
    fn test_strings() {
        assert_eq!(num(json!("1200")), 1200.0);
        assert_eq!(num(json!("  99.5 ")), 99.5);
        assert_eq!(num(json!("")), 0.0);
        assert_eq!(num(json!("   ")), 0.0);
        assert_eq!(num(json!("1e3")), 1000.0);
        assert_eq!(num(json!(".5")), 0.5);
        assert_eq!(num(json!("0x1F")), 31.0);
        assert_eq!(num(json!("0b101")), 5.0);
        assert_eq!(num(json!("Infinity")), f64::INFINITY);
        assert!(num(json!("12 dollars")).is_nan());
        assert!(num(json!("inf")).is_nan());
        assert!(num(json!("NaN")).is_nan());
        assert!(num(json!("-0x10")).is_nan());
        assert!(num(json!("0x")).is_nan());
    }

    #[test]
    fn test_arrays() {
        assert_eq!(num(json!([])), 0.0);
        assert_eq!(num(json!([700])), 700.0);
        assert_eq!(num(json!(["700"])), 700.0);
        assert_eq!(num(json!([null])), 0.0);
        assert!(num(json!([1, 2])).is_nan());
        assert!(num(json!([true])).is_nan());
        assert!(num(json!([{"cents": 5}])).is_nan());
    }

    #[test]
    fn test_nested_arrays() {
        assert_eq!(num(json!([[5]])), 5.0);
        assert_eq!(num(json!([[]])), 0.0);
        assert_eq!(num(json!([[["75"]]])), 75.0);
        assert_eq!(num(json!([[null]])), 0.0);
        assert!(num(json!([[1, 2]])).is_nan());
    }

    #[test]
    fn test_out_of_range_literals() {
        let value: Value = serde_json::from_str("[1e400, -1e400]").unwrap();
        assert_eq!(to_number(value.get(0)), f64::INFINITY);
        assert_eq!(to_number(value.get(1)), f64::NEG_INFINITY);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(49.5), 50.0);
        assert_eq!(round_half_up(49.49), 49.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert!(round_half_up(f64::NAN).is_nan());
    }
}
