//! Error types shared by the HTTP handlers

mod types;

pub use types::ApiError;
