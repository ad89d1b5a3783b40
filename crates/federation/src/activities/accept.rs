//! Accept activity.

use activitypub_federation::kinds::activity::AcceptType;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::activities::FollowActivity;

/// `ActivityPub` Accept activity.
/// Used to accept a Follow request.
///
/// The object embeds the Follow being answered in full; handlers match
/// it to local state by its (actor, object) pair.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptActivity {
    #[serde(rename = "type")]
    pub kind: AcceptType,
    pub id: Url,
    /// IRI of the member accepting the follow.
    pub actor: Url,
    /// The original Follow activity being accepted.
    pub object: FollowActivity,
}

impl AcceptActivity {
    /// Create a new Accept activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: FollowActivity) -> Self {
        Self {
            kind: AcceptType::Accept,
            id,
            actor,
            object,
        }
    }
}
