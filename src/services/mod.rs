//! Services module
//!
//! Contains external service integrations.

pub mod stripe;

pub use stripe::{CheckoutProvider, StripeConfig, StripeError, StripeService};
