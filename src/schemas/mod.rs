//! Schema module
//!
//! Inbound cart payloads and outbound Stripe Checkout shapes.

pub mod cart;
pub mod stripe;

pub use cart::{CartItem, CheckoutForm};
pub use stripe::{
    CheckoutMode, CheckoutSession, CheckoutSessionRequest, LineItem, PriceData, ProductData,
};
