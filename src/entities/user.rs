//! User entity - The base identity record the storefront extends.
//!
//! Authentication itself (passwords, sessions) lives in an external identity
//! subsystem; this table carries the attributes the storefront and its admin
//! surface need: role flags, the assigned role group, and contact basics.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique
    #[sea_orm(unique)]
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Grants access to the admin surface
    pub is_staff: bool,
    /// Grants unrestricted admin capability
    pub is_superuser: bool,
    /// Inactive users cannot act
    pub is_active: bool,
    /// Role group assigned from the flags, if any
    pub group_id: Option<i64>,
    /// When the account was created
    pub date_joined: DateTimeUtc,
}

impl Model {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile per user
    #[sea_orm(has_one = "super::user_profile::Entity")]
    UserProfile,
    /// Cart rows owned by this user
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItem,
    /// Orders placed by this user
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
    /// Assigned role group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItem.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
