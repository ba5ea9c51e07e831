//! Utility modules
//!
//! Contains value coercion helpers.

pub mod number;

pub use number::{parse_numeric_str, round_half_up, to_number};
