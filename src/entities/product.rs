//! Product entity - A catalog item offered by the storefront.
//!
//! Stock is only ever mutated by the order engine (conditional atomic
//! decrement at checkout). A product with `unlimited_stock` set never runs
//! out; otherwise availability requires a positive stock count.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product
    pub name: String,
    /// URL-friendly identifier, unique across products
    #[sea_orm(unique)]
    pub slug: String,
    /// Category this product belongs to
    pub category_id: i64,
    /// Optional kosher certification
    pub kashrut_id: Option<i64>,
    /// Long-form description shown on the detail page
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Unit price in the store currency
    pub price: f64,
    /// Optional image URL
    pub image_url: Option<String>,
    /// Units on hand; ignored when `unlimited_stock` is set
    pub stock: i32,
    /// Product never runs out (e.g. donations, digital goods)
    pub unlimited_stock: bool,
    /// Whether the product is offered at all
    pub is_active: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// A product can be purchased when it is active and has stock to sell.
    pub fn available(&self) -> bool {
        self.is_active && (self.unlimited_stock || self.stock > 0)
    }
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// Optional kosher certification
    #[sea_orm(
        belongs_to = "super::kashrut::Entity",
        from = "Column::KashrutId",
        to = "super::kashrut::Column::Id"
    )]
    Kashrut,
    /// Cart rows referencing this product
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItem,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::kashrut::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kashrut.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i32, unlimited: bool, active: bool) -> Model {
        Model {
            id: 1,
            name: "Test".to_string(),
            slug: "test".to_string(),
            category_id: 1,
            kashrut_id: None,
            description: String::new(),
            price: 10.0,
            image_url: None,
            stock,
            unlimited_stock: unlimited,
            is_active: active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_inactive_product_never_available() {
        assert!(!product(100, false, false).available());
        assert!(!product(0, true, false).available());
    }

    #[test]
    fn test_availability_follows_stock() {
        assert!(product(1, false, true).available());
        assert!(!product(0, false, true).available());
        assert!(product(0, true, true).available());
    }
}
