//! Follow edge entity (accepted, active follow relationships).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Relation tables reference members by normalized handle, not by id.
/// Stale identities are never purged here, so there is no foreign key
/// back to `member`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow_edge")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Handle of the member who follows
    pub requester: String,

    /// Handle of the member being followed
    pub target: String,

    /// Whether reshares by the target appear in the requester's feed
    #[sea_orm(default_value = true)]
    pub reblogs: bool,

    /// Whether the requester is notified of the target's activity
    #[sea_orm(default_value = false)]
    pub notifications: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
