//! Kashrut entity - Kosher certification a product can carry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kashrut certification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kashrut")]
pub struct Model {
    /// Unique identifier for the certification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the certification, unique
    #[sea_orm(unique)]
    pub name: String,
    /// Certifying authority
    pub certifier: String,
    /// Whether the certification is currently offered
    pub is_active: bool,
}

/// Defines relationships between Kashrut and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A certification may apply to many products
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
