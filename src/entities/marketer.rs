//! Marketer entity - Referral partner attributable to users and orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marketer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marketers")]
pub struct Model {
    /// Unique identifier for the marketer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the marketer
    pub name: String,
    /// Contact phone, empty when unknown
    pub phone: String,
    /// Contact email, empty when unknown
    pub email: String,
    /// Whether the marketer is active for new attributions
    pub is_active: bool,
    /// When the marketer was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Marketer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Orders attributed to this marketer
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
    /// Profiles linked to this marketer
    #[sea_orm(has_many = "super::user_profile::Entity")]
    UserProfile,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
