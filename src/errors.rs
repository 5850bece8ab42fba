//! Unified error types and result handling for the storefront.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry
//! enough context to render a useful message to the user; the web layer maps
//! each variant onto an HTTP status in the [`IntoResponse`] impl below.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Input failed validation before any state was mutated
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the invalid input
        message: String,
    },

    /// A quantity exceeded the product's available stock
    #[error("Insufficient stock for '{product}': requested {requested}, available {available}")]
    InsufficientStock {
        /// Product name, for the user-facing message
        product: String,
        /// Quantity the user asked for
        requested: i32,
        /// Stock on hand at the time of the check
        available: i32,
    },

    /// Checkout was attempted with no cart rows
    #[error("Cart is empty")]
    EmptyCart,

    /// The referenced record does not exist or belongs to someone else
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "product" or "order"
        entity: &'static str,
        /// Identifier the caller used
        id: String,
    },

    /// No authenticated user context was supplied
    #[error("Authentication required: {message}")]
    Unauthorized {
        /// Why the request was rejected
        message: String,
    },

    /// The authenticated user lacks the required role
    #[error("Permission denied: {message}")]
    Forbidden {
        /// Which rule blocked the request
        message: String,
    },

    /// Database error from SeaORM
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation { .. } | Error::EmptyCart => StatusCode::BAD_REQUEST,
            Error::InsufficientStock { .. } => StatusCode::CONFLICT,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) | Error::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "responding with internal error");
            // Don't leak internals to the client
            return (status, Json(json!({ "error": "internal server error" }))).into_response();
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
