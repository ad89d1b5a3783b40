//! Reject activity.

use activitypub_federation::kinds::activity::RejectType;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::activities::FollowActivity;

/// `ActivityPub` Reject activity.
/// Used to reject a Follow request.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectActivity {
    #[serde(rename = "type")]
    pub kind: RejectType,
    pub id: Url,
    /// IRI of the member rejecting the follow.
    pub actor: Url,
    /// The original Follow activity being rejected.
    pub object: FollowActivity,
}

impl RejectActivity {
    /// Create a new Reject activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: FollowActivity) -> Self {
        Self {
            kind: RejectType::Reject,
            id,
            actor,
            object,
        }
    }
}
