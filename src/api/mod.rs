//! API endpoint handlers module
//!
//! Contains all HTTP endpoint handler implementations.

pub mod checkout;
pub mod health;
