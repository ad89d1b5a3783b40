//! Inbound activity translation.

use shelfmark_common::{AppError, AppResult};
use shelfmark_core::{FollowOptions, FollowOutcome, FollowService};
use shelfmark_db::entities::{follow_edge, follow_request};
use tracing::info;

use crate::activities::{AcceptActivity, FollowActivity, RejectActivity, UndoActivity};
use crate::iri::identity_from_iri;

/// Maps verified inbound activities onto the relationship engine.
///
/// Parsing and signature checks happen upstream; this layer only
/// translates IRIs to identities and invokes the engine, which applies
/// the same state machine it applies to local callers.
#[derive(Clone)]
pub struct InboundTranslator {
    follow_service: FollowService,
}

impl InboundTranslator {
    /// Create a new inbound translator.
    #[must_use]
    pub const fn new(follow_service: FollowService) -> Self {
        Self { follow_service }
    }

    /// Handle a remote Follow: file a request exactly as a local
    /// caller would.
    ///
    /// The returned outcome tells the caller whether an Accept needs
    /// to go back (auto-accepted) or the request awaits review.
    pub async fn handle_follow(&self, activity: &FollowActivity) -> AppResult<FollowOutcome> {
        let requester = identity_from_iri(&activity.actor)?;
        let target = identity_from_iri(&activity.object)?;

        info!(
            requester = %requester,
            target = %target,
            "Processing Follow activity"
        );

        self.follow_service
            .request_follow(&requester, &target, FollowOptions::default())
            .await
    }

    /// Handle a remote Accept answering a Follow we issued.
    ///
    /// The remote side does not know our request id, so it is
    /// recovered from the embedded Follow's (requester, target) pair.
    /// The engine's ownership check then rejects an Accept whose actor
    /// is not the request's target.
    pub async fn handle_accept(&self, activity: &AcceptActivity) -> AppResult<follow_edge::Model> {
        let accepter = identity_from_iri(&activity.actor)?;
        let requester = identity_from_iri(&activity.object.actor)?;
        let target = identity_from_iri(&activity.object.object)?;

        info!(
            accepter = %accepter,
            requester = %requester,
            "Processing Accept activity"
        );

        let request = self
            .follow_service
            .find_request(&requester, &target)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No pending follow request from {requester} to {target}"
                ))
            })?;

        self.follow_service
            .accept_follow(&accepter, &request.id)
            .await
    }

    /// Handle a remote Reject answering a Follow we issued.
    pub async fn handle_reject(
        &self,
        activity: &RejectActivity,
    ) -> AppResult<follow_request::Model> {
        let rejecter = identity_from_iri(&activity.actor)?;
        let requester = identity_from_iri(&activity.object.actor)?;
        let target = identity_from_iri(&activity.object.object)?;

        info!(
            rejecter = %rejecter,
            requester = %requester,
            "Processing Reject activity"
        );

        let request = self
            .follow_service
            .find_request(&requester, &target)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No pending follow request from {requester} to {target}"
                ))
            })?;

        self.follow_service
            .reject_follow(&rejecter, &request.id)
            .await
    }

    /// Handle a remote Undo of a Follow: dissolve the pending request
    /// or the accepted edge, whichever exists.
    pub async fn handle_undo(&self, activity: &UndoActivity) -> AppResult<()> {
        let actor = identity_from_iri(&activity.actor)?;
        let requester = identity_from_iri(&activity.object.actor)?;
        let target = identity_from_iri(&activity.object.object)?;

        if actor != requester {
            return Err(AppError::Forbidden(
                "Only the requester may undo a follow".to_string(),
            ));
        }

        info!(
            requester = %requester,
            target = %target,
            "Processing Undo activity"
        );

        self.follow_service.remove_follower(&requester, &target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use shelfmark_common::{Identity, SystemClock};
    use shelfmark_core::{AutoAcceptPolicy, BlockGuard, IdentityResolver};
    use shelfmark_db::entities::{block, follow_edge, follow_request, member};
    use shelfmark_db::repositories::{BlockRepository, MemberRepository};
    use url::Url;

    use crate::activities::FollowActivity;
    use crate::iri::actor_iri;

    const LOCAL_DOMAIN: &str = "books.example";

    fn translator(db: DatabaseConnection) -> InboundTranslator {
        let db = Arc::new(db);
        InboundTranslator::new(FollowService::new(
            db.clone(),
            IdentityResolver::new(db.clone(), MemberRepository::new()),
            BlockGuard::new(BlockRepository::new()),
            AutoAcceptPolicy::new(MemberRepository::new(), LOCAL_DOMAIN.to_string()),
            Arc::new(SystemClock::new()),
        ))
    }

    fn member_iri(handle: &str) -> Url {
        actor_iri(&Identity::parse(handle).unwrap()).unwrap()
    }

    fn activity_iri(path: &str) -> Url {
        Url::parse(&format!("https://other.example/activities/{path}")).unwrap()
    }

    fn create_test_member(handle: &str, auto_accept: bool) -> member::Model {
        member::Model {
            id: "m1".to_string(),
            handle: handle.to_string(),
            display_name: None,
            auto_accept_follows: auto_accept,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_request(id: &str, requester: &str, target: &str) -> follow_request::Model {
        follow_request::Model {
            id: id.to_string(),
            requester: requester.to_string(),
            target: target.to_string(),
            wants_reblogs: true,
            wants_notifications: false,
            created_at: Utc::now().into(),
        }
    }

    fn follow_activity(requester: &str, target: &str) -> FollowActivity {
        FollowActivity::new(
            activity_iri("follow/remote-1"),
            member_iri(requester),
            member_iri(target),
        )
    }

    #[tokio::test]
    async fn test_handle_follow_files_pending_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("carol@books.example", false)]])
            .append_query_results([Vec::<block::Model>::new()])
            .append_query_results([Vec::<follow_edge::Model>::new()])
            .append_query_results([Vec::<follow_request::Model>::new()])
            .append_query_results([[create_test_member("carol@books.example", false)]])
            .append_query_results([[create_test_request(
                "r1",
                "dave@other.example",
                "carol@books.example",
            )]])
            .into_connection();

        let outcome = translator(db)
            .handle_follow(&follow_activity("dave@other.example", "carol@books.example"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            FollowOutcome::Pending {
                id: "r1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_handle_follow_rejects_foreign_object_iri() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let activity = FollowActivity::new(
            activity_iri("follow/remote-1"),
            member_iri("dave@other.example"),
            Url::parse("https://books.example/shelves/42").unwrap(),
        );

        let result = translator(db).handle_follow(&activity).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_handle_accept_promotes_tracked_request() {
        // alice (local) asked to follow carol (remote); carol accepts.
        let request = create_test_request("r1", "alice@books.example", "carol@other.example");
        let edge = follow_edge::Model {
            id: "e1".to_string(),
            requester: "alice@books.example".to_string(),
            target: "carol@other.example".to_string(),
            reblogs: true,
            notifications: false,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[request.clone()]])
            .append_query_results([[request]])
            .append_query_results([[edge]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let activity = AcceptActivity::new(
            activity_iri("accept/9"),
            member_iri("carol@other.example"),
            follow_activity("alice@books.example", "carol@other.example"),
        );

        let edge = translator(db).handle_accept(&activity).await.unwrap();

        assert_eq!(edge.requester, "alice@books.example");
        assert_eq!(edge.target, "carol@other.example");
    }

    #[tokio::test]
    async fn test_handle_accept_without_pending_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<follow_request::Model>::new()])
            .into_connection();

        let activity = AcceptActivity::new(
            activity_iri("accept/9"),
            member_iri("carol@other.example"),
            follow_activity("alice@books.example", "carol@other.example"),
        );

        let result = translator(db).handle_accept(&activity).await;

        match result {
            Err(AppError::NotFound(msg)) => assert!(msg.contains("alice@books.example")),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_handle_accept_from_wrong_actor_is_forbidden() {
        let request = create_test_request("r1", "alice@books.example", "carol@other.example");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[request.clone()]])
            .append_query_results([[request]])
            .into_connection();

        // mallory claims to accept a request addressed to carol.
        let activity = AcceptActivity::new(
            activity_iri("accept/9"),
            member_iri("mallory@other.example"),
            follow_activity("alice@books.example", "carol@other.example"),
        );

        let result = translator(db).handle_accept(&activity).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_handle_reject_resolves_tracked_request() {
        let request = create_test_request("r1", "alice@books.example", "carol@other.example");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[request.clone()]])
            .append_query_results([[request]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let activity = RejectActivity::new(
            activity_iri("reject/9"),
            member_iri("carol@other.example"),
            follow_activity("alice@books.example", "carol@other.example"),
        );

        let request = translator(db).handle_reject(&activity).await.unwrap();

        assert_eq!(request.id, "r1");
    }

    #[tokio::test]
    async fn test_handle_undo_dissolves_relationship() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let activity = UndoActivity::new(
            activity_iri("undo/9"),
            member_iri("dave@other.example"),
            follow_activity("dave@other.example", "carol@books.example"),
        );

        translator(db).handle_undo(&activity).await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_undo_from_wrong_actor_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let activity = UndoActivity::new(
            activity_iri("undo/9"),
            member_iri("mallory@other.example"),
            follow_activity("dave@other.example", "carol@books.example"),
        );

        let result = translator(db).handle_undo(&activity).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_follow_activity_wire_shape() {
        let activity = follow_activity("dave@other.example", "carol@books.example");
        let value = serde_json::to_value(&activity).unwrap();

        assert_eq!(value["type"], "Follow");
        assert_eq!(value["actor"], "https://other.example/members/dave");
        assert_eq!(value["object"], "https://books.example/members/carol");

        let parsed: FollowActivity = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.actor.as_str(), "https://other.example/members/dave");
    }
}
