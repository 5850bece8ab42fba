//! Order entity - An immutable purchase created atomically at checkout.
//!
//! Customer fields are a snapshot of what the buyer submitted; the total is
//! the sum of the line items' frozen prices. Only `status`, `payment_status`
//! and `updated_at` change after creation, and orders are never deleted —
//! deleting the buyer's account clears `user_id` and nothing else.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order statuses an admin may move an order through.
pub const ORDER_STATUSES: [&str; 5] =
    ["pending", "processing", "shipped", "delivered", "cancelled"];

/// Payment statuses an admin may record.
pub const PAYMENT_STATUSES: [&str; 3] = ["unpaid", "paid", "refunded"];

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing order number, unique and immutable once assigned
    #[sea_orm(unique)]
    pub order_number: String,
    /// User who placed the order; cleared when the account is deleted, the
    /// snapshot fields below keep the customer data
    pub user_id: Option<i64>,
    /// Customer first name as submitted at checkout
    pub first_name: String,
    /// Customer last name as submitted at checkout
    pub last_name: String,
    /// Customer email as submitted at checkout
    pub email: String,
    /// Customer phone as submitted at checkout
    pub phone: String,
    /// Shipping address, may be empty for charity/digital products
    pub address: String,
    /// Shipping city, may be empty
    pub city: String,
    /// Shipping postal code, may be empty
    pub postal_code: String,
    /// Free-form customer notes
    pub notes: Option<String>,
    /// Marketer the order is attributed to, if any
    pub marketer_id: Option<i64>,
    /// Sum of item price x quantity at creation time
    pub total_amount: f64,
    /// One of [`ORDER_STATUSES`]
    pub status: String,
    /// One of [`PAYMENT_STATUSES`]
    pub payment_status: String,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Optional marketer attribution
    #[sea_orm(
        belongs_to = "super::marketer::Entity",
        from = "Column::MarketerId",
        to = "super::marketer::Column::Id"
    )]
    Marketer,
    /// An order exclusively owns its line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::marketer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marketer.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
