//! Follow request entity (follows awaiting accept, reject, or cancel).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Handle of the member who asked to follow
    pub requester: String,

    /// Handle of the member being asked
    pub target: String,

    /// Requested reshare visibility, carried into the edge on accept
    #[sea_orm(default_value = true)]
    pub wants_reblogs: bool,

    /// Requested notification setting, carried into the edge on accept
    #[sea_orm(default_value = false)]
    pub wants_notifications: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
