//! Configuration management for database and application settings.

/// Database connection and table creation
pub mod database;

/// Server settings loaded from config.toml with env fallbacks
pub mod server;

pub use server::{load_app_configuration, AppConfig, ServerConfig};
