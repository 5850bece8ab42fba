//! Event entity - Charity event reference data managed by admins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the event
    pub name: String,
    /// When the event takes place, if scheduled
    pub event_date: Option<DateTimeUtc>,
    /// Where the event takes place, empty when unknown
    pub location: String,
    /// Whether the event is shown to users
    pub is_active: bool,
    /// When the event record was created
    pub created_at: DateTimeUtc,
}

/// Events reference no other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
