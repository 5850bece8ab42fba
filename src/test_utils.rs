//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{accounts, catalog, checkout},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category named `name`, slug derived from the name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    catalog::create_category(db, name, None).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * price: 10.0
/// * stock: 5
/// * active, limited stock
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
) -> Result<entities::product::Model> {
    create_custom_product(db, name, category_id, 5, |_| {}).await
}

/// Creates a test product with `stock` units, letting the caller tweak the
/// remaining fields through the closure.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
    stock: i32,
    customize: impl FnOnce(&mut catalog::NewProduct),
) -> Result<entities::product::Model> {
    let mut new = catalog::NewProduct {
        name: name.to_string(),
        slug: None,
        category_id,
        kashrut_id: None,
        description: format!("{name} (test)"),
        price: 10.0,
        image_url: None,
        stock,
        unlimited_stock: false,
        is_active: true,
    };
    customize(&mut new);
    catalog::create_product(db, new).await
}

/// Creates a regular active test user (profile provisioned).
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    create_custom_user(db, username, false, false).await
}

/// Creates a test user with specific admin flags.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    username: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<entities::user::Model> {
    accounts::create_user(
        db,
        accounts::NewUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{username}@example.org"),
            is_staff,
            is_superuser,
        },
    )
    .await
}

/// Valid checkout details for tests.
pub fn test_customer_details() -> checkout::CustomerDetails {
    checkout::CustomerDetails {
        first_name: "Test".to_string(),
        last_name: "Buyer".to_string(),
        email: "buyer@example.org".to_string(),
        phone: "050-000-0000".to_string(),
        ..Default::default()
    }
}

/// Sets up a database with one category.
pub async fn setup_with_category() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Test Category").await?;
    Ok((db, category))
}

/// Sets up a database with one regular user.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test_user").await?;
    Ok((db, user))
}

/// Sets up a database with a user and a purchasable product
/// (stock 5, price 10.0). The common fixture for cart and checkout tests.
pub async fn setup_with_user_and_product() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test_user").await?;
    let category = create_test_category(&db, "Test Category").await?;
    let product = create_test_product(&db, "Test Product", category.id).await?;
    Ok((db, user, product))
}
