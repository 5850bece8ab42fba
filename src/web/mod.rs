//! Web interface - axum router, extractors and JSON handlers.
//!
//! Handlers are thin shells over [`crate::core`]: they parse the request,
//! call one core function and serialize the result. HTML rendering is an
//! external concern; every endpoint returns the context data as JSON.

/// Authenticated-user extractor
pub mod extract;
/// Request handlers grouped by area
pub mod handlers;
/// Route table
pub mod routes;
/// Shared application state
pub mod state;

pub use routes::build_router;
pub use state::AppState;
