//! User profile entity - Storefront extension of the base identity.
//!
//! Exactly one profile exists per user; the unique `user_id` column backs the
//! idempotent provisioning upsert in [`crate::core::accounts`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile roles a user can hold.
pub const USER_TYPES: [&str; 4] = ["regular", "staff", "admin", "marketer"];

/// Default role assigned at provisioning time.
pub const DEFAULT_USER_TYPE: &str = "regular";

/// User profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked user, exactly one profile per user
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Primary phone, empty when not provided
    pub phone: String,
    /// Secondary phone, empty when not provided
    pub phone2: String,
    /// Street address, empty when not provided
    pub address: String,
    /// One of [`USER_TYPES`]
    pub user_type: String,
    /// Marketer this user is attributed to, if any
    pub marketer_id: Option<i64>,
    /// Inactive profiles are hidden from attribution and listings
    pub is_active: bool,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between UserProfile and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Optional marketer attribution
    #[sea_orm(
        belongs_to = "super::marketer::Entity",
        from = "Column::MarketerId",
        to = "super::marketer::Column::Id"
    )]
    Marketer,
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

impl ActiveModelBehavior for ActiveModel {}
