//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`
//! so the schema always matches the Rust structs; the one thing the entity
//! macros cannot express, the composite unique index on (user, product) cart
//! rows, is created explicitly afterwards.

use crate::entities::{
    cart_item, CartItem, Category, Event, Group, Kashrut, Marketer, Order, OrderItem, Product,
    User, UserProfile,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/chesed_store.sqlite".to_string())
}

/// Establishes a connection to the database using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables (idempotently) from the entity definitions, plus the
/// uniqueness index that enforces one cart row per (user, product) pair.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Kashrut),
        schema.create_table_from_entity(Marketer),
        schema.create_table_from_entity(Event),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Group),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(UserProfile),
        schema.create_table_from_entity(CartItem),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
    ];
    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    let cart_unique = Index::create()
        .name("idx_cart_items_user_product")
        .table(CartItem)
        .col(cart_item::Column::UserId)
        .col(cart_item::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&cart_unique)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CartItemModel, OrderModel, ProductModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<CartItemModel> = CartItem::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
