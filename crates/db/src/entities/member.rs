//! Member entity (local and remote accounts known to this instance).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Normalized `name@domain` handle
    #[sea_orm(unique)]
    pub handle: String,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Whether incoming follow requests resolve to an edge without review
    #[sea_orm(default_value = false)]
    pub auto_accept_follows: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
