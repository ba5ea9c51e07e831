//! Server module
//!
//! Application state, the router and the server lifecycle.

pub mod app;
pub mod routes;
pub mod state;

pub use app::App;
pub use state::AppState;
