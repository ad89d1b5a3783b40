//! Outbound activity builders.

use shelfmark_common::{AppError, AppResult, Identity};
use shelfmark_db::entities::{follow_edge, follow_request};
use url::Url;

use crate::activities::{AcceptActivity, FollowActivity, RejectActivity, UndoActivity};
use crate::iri::actor_iri;

/// Builds wire activities from stored relationship rows.
///
/// Pure mapping, no side effects; delivery is an external
/// collaborator's responsibility. Activity ids are minted under the
/// local domain and embed the row id, so a resent activity keeps its
/// id and remote deduplication works.
#[derive(Clone, Debug)]
pub struct OutboundTranslator {
    local_domain: String,
}

impl OutboundTranslator {
    /// Create a new outbound translator for the given local domain.
    #[must_use]
    pub const fn new(local_domain: String) -> Self {
        Self { local_domain }
    }

    /// Follow activity announcing a pending request to its target.
    pub fn follow(&self, request: &follow_request::Model) -> AppResult<FollowActivity> {
        Ok(FollowActivity::new(
            self.activity_iri("follow", &request.id)?,
            handle_iri(&request.requester)?,
            handle_iri(&request.target)?,
        ))
    }

    /// Accept answering a request, echoing the Follow being accepted.
    pub fn accept(&self, request: &follow_request::Model) -> AppResult<AcceptActivity> {
        Ok(AcceptActivity::new(
            self.activity_iri("accept", &request.id)?,
            handle_iri(&request.target)?,
            self.follow(request)?,
        ))
    }

    /// Reject answering a request.
    pub fn reject(&self, request: &follow_request::Model) -> AppResult<RejectActivity> {
        Ok(RejectActivity::new(
            self.activity_iri("reject", &request.id)?,
            handle_iri(&request.target)?,
            self.follow(request)?,
        ))
    }

    /// Undo withdrawing a still-pending request.
    pub fn undo_request(&self, request: &follow_request::Model) -> AppResult<UndoActivity> {
        Ok(UndoActivity::new(
            self.activity_iri("undo", &request.id)?,
            handle_iri(&request.requester)?,
            self.follow(request)?,
        ))
    }

    /// Undo dissolving an accepted edge.
    ///
    /// The original request row is gone by now, so the embedded Follow
    /// is reconstructed around the edge id. Remote sides match an Undo
    /// by its (actor, object) pair, not by the inner id.
    pub fn undo_edge(&self, edge: &follow_edge::Model) -> AppResult<UndoActivity> {
        let follow = FollowActivity::new(
            self.activity_iri("follow", &edge.id)?,
            handle_iri(&edge.requester)?,
            handle_iri(&edge.target)?,
        );

        Ok(UndoActivity::new(
            self.activity_iri("undo", &edge.id)?,
            handle_iri(&edge.requester)?,
            follow,
        ))
    }

    fn activity_iri(&self, kind: &str, id: &str) -> AppResult<Url> {
        Url::parse(&format!(
            "https://{}/activities/{kind}/{id}",
            self.local_domain
        ))
        .map_err(|e| AppError::InvalidInput(format!("Cannot build activity IRI: {e}")))
    }
}

/// Actor IRI for a stored handle.
fn handle_iri(handle: &str) -> AppResult<Url> {
    actor_iri(&Identity::parse(handle)?)
}
