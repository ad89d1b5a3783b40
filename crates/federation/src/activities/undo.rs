//! Undo activity.

use activitypub_federation::kinds::activity::UndoType;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::activities::FollowActivity;

/// `ActivityPub` Undo activity.
/// Used to withdraw a pending Follow or dissolve an accepted one.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoActivity {
    #[serde(rename = "type")]
    pub kind: UndoType,
    pub id: Url,
    /// IRI of the member undoing their follow.
    pub actor: Url,
    /// The Follow activity being undone.
    pub object: FollowActivity,
}

impl UndoActivity {
    /// Create a new Undo activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: FollowActivity) -> Self {
        Self {
            kind: UndoType::Undo,
            id,
            actor,
            object,
        }
    }
}
