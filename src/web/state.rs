//! Shared application state handed to every handler.

use crate::config::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// State cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the connection and configuration.
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}
