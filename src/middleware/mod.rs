//! Middleware module
//!
//! Contains HTTP middleware for request logging.

pub mod logging;

pub use logging::{log_request, TraceId, REQUEST_ID_HEADER, TRACE_ID_HEADER};
