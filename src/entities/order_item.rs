//! Order item entity - A line of an order with price frozen at checkout.
//!
//! `price` and `product_name` are copies taken when the order was created;
//! later catalog edits do not affect them. Rows are deleted only via their
//! parent order's cascade, which in practice never happens.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent order
    pub order_id: i64,
    /// Product this line refers to
    pub product_id: i64,
    /// Product name at the time of the order
    pub product_name: String,
    /// Ordered quantity
    pub quantity: i32,
    /// Unit price at the time of the order
    pub price: f64,
}

impl Model {
    /// Line total at the frozen unit price.
    pub fn total_price(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one order and dies with it
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    /// Each line item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
