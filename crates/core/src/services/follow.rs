//! Follow service.

use std::sync::Arc;

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use shelfmark_common::{AppError, AppResult, Clock, IdGenerator, Identity};
use shelfmark_db::{
    entities::{follow_edge, follow_request},
    repositories::{FollowEdgeRepository, FollowRequestRepository},
};

use crate::services::{AutoAcceptPolicy, BlockGuard, IdentityResolver};

/// Follow service for relationship state transitions.
///
/// Every mutation runs in a single transaction, so the block check and
/// the write it protects see the same snapshot and concurrent repeats
/// resolve on the store's unique pair constraints.
#[derive(Clone)]
pub struct FollowService {
    db: Arc<DatabaseConnection>,
    resolver: IdentityResolver,
    edge_repo: FollowEdgeRepository,
    request_repo: FollowRequestRepository,
    guard: BlockGuard,
    policy: AutoAcceptPolicy,
    id_gen: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        resolver: IdentityResolver,
        guard: BlockGuard,
        policy: AutoAcceptPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            resolver,
            edge_repo: FollowEdgeRepository::new(),
            request_repo: FollowRequestRepository::new(),
            guard,
            policy,
            id_gen: IdGenerator::new(),
            clock,
        }
    }

    /// File a follow request from `requester` toward `target`.
    ///
    /// Resolves to exactly one [`FollowOutcome`]. Repeats and vetoed
    /// requests are outcomes, not errors, so callers can retry the
    /// call without special-casing.
    pub async fn request_follow(
        &self,
        requester: &Identity,
        target: &Identity,
        options: FollowOptions,
    ) -> AppResult<FollowOutcome> {
        // Self-follow is a caller bug, not an outcome.
        if requester == target {
            return Err(AppError::InvalidInput("Cannot follow yourself".to_string()));
        }

        // The requester is the authenticated caller; only the target
        // has to be a known member.
        self.resolver.resolve_required(target).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::store("begin_request_follow", e))?;

        if self
            .guard
            .is_blocked(&txn, requester.as_str(), target.as_str())
            .await?
        {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_request_follow", e))?;
            return Ok(FollowOutcome::Blocked);
        }

        if self
            .edge_repo
            .find_by_pair(&txn, requester.as_str(), target.as_str())
            .await?
            .is_some()
        {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_request_follow", e))?;
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        if self
            .request_repo
            .find_by_pair(&txn, requester.as_str(), target.as_str())
            .await?
            .is_some()
        {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_request_follow", e))?;
            return Ok(FollowOutcome::AlreadyPending);
        }

        if self.policy.should_auto_accept(&txn, target).await? {
            let edge = follow_edge::ActiveModel {
                id: Set(self.id_gen.generate()),
                requester: Set(requester.as_str().to_string()),
                target: Set(target.as_str().to_string()),
                reblogs: Set(options.reblogs),
                notifications: Set(options.notify),
                created_at: Set(self.clock.now().into()),
            };

            match self.edge_repo.create(&txn, edge).await {
                Ok(created) => {
                    txn.commit()
                        .await
                        .map_err(|e| AppError::store("commit_request_follow", e))?;
                    tracing::debug!(
                        requester = %requester,
                        target = %target,
                        "Follow request auto-accepted"
                    );
                    Ok(FollowOutcome::Accepted {
                        accept_time: created.created_at,
                    })
                }
                Err(AppError::Duplicate(_)) => {
                    txn.rollback()
                        .await
                        .map_err(|e| AppError::store("rollback_request_follow", e))?;
                    self.repeat_outcome(requester, target).await
                }
                Err(e) => Err(e),
            }
        } else {
            let request = follow_request::ActiveModel {
                id: Set(self.id_gen.generate()),
                requester: Set(requester.as_str().to_string()),
                target: Set(target.as_str().to_string()),
                wants_reblogs: Set(options.reblogs),
                wants_notifications: Set(options.notify),
                created_at: Set(self.clock.now().into()),
            };

            match self.request_repo.create(&txn, request).await {
                Ok(created) => {
                    txn.commit()
                        .await
                        .map_err(|e| AppError::store("commit_request_follow", e))?;
                    tracing::debug!(
                        requester = %requester,
                        target = %target,
                        request_id = %created.id,
                        "Follow request filed"
                    );
                    Ok(FollowOutcome::Pending { id: created.id })
                }
                Err(AppError::Duplicate(_)) => {
                    txn.rollback()
                        .await
                        .map_err(|e| AppError::store("rollback_request_follow", e))?;
                    self.repeat_outcome(requester, target).await
                }
                Err(e) => Err(e),
            }
        }
    }

    /// Promote a pending request into a follow edge.
    ///
    /// Only the request's target may accept. The row lock and the
    /// delete count decide races against a concurrent reject or
    /// cancel: whoever removes the row wins, the loser sees
    /// `NotFound`.
    pub async fn accept_follow(
        &self,
        accepter: &Identity,
        request_id: &str,
    ) -> AppResult<follow_edge::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::store("begin_accept_follow", e))?;

        let Some(request) = self
            .request_repo
            .find_by_id_for_update(&txn, request_id)
            .await?
        else {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_accept_follow", e))?;
            return Err(AppError::NotFound("Follow request not found".to_string()));
        };

        if request.target != accepter.as_str() {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_accept_follow", e))?;
            return Err(AppError::Forbidden(
                "Only the target of a follow request may accept it".to_string(),
            ));
        }

        let deleted = self.request_repo.delete_by_id(&txn, &request.id).await?;
        if deleted == 0 {
            // A concurrent reject or cancel resolved the request first.
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_accept_follow", e))?;
            return Err(AppError::NotFound(
                "Follow request already resolved".to_string(),
            ));
        }

        let edge = follow_edge::ActiveModel {
            id: Set(self.id_gen.generate()),
            requester: Set(request.requester),
            target: Set(request.target),
            reblogs: Set(request.wants_reblogs),
            notifications: Set(request.wants_notifications),
            created_at: Set(self.clock.now().into()),
        };
        let edge = self.edge_repo.create(&txn, edge).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::store("commit_accept_follow", e))?;

        tracing::debug!(
            requester = %edge.requester,
            target = %edge.target,
            "Follow request accepted"
        );

        Ok(edge)
    }

    /// Reject a pending request. Only the request's target may reject.
    ///
    /// Returns the resolved request so callers know which pair it
    /// concerned.
    pub async fn reject_follow(
        &self,
        rejecter: &Identity,
        request_id: &str,
    ) -> AppResult<follow_request::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::store("begin_reject_follow", e))?;

        let Some(request) = self
            .request_repo
            .find_by_id_for_update(&txn, request_id)
            .await?
        else {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_reject_follow", e))?;
            return Err(AppError::NotFound("Follow request not found".to_string()));
        };

        if request.target != rejecter.as_str() {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_reject_follow", e))?;
            return Err(AppError::Forbidden(
                "Only the target of a follow request may reject it".to_string(),
            ));
        }

        let deleted = self.request_repo.delete_by_id(&txn, &request.id).await?;
        if deleted == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_reject_follow", e))?;
            return Err(AppError::NotFound(
                "Follow request already resolved".to_string(),
            ));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::store("commit_reject_follow", e))?;

        tracing::debug!(
            requester = %request.requester,
            target = %request.target,
            "Follow request rejected"
        );

        Ok(request)
    }

    /// Withdraw a pending request. Only the request's requester may
    /// cancel.
    pub async fn cancel_follow(
        &self,
        requester: &Identity,
        request_id: &str,
    ) -> AppResult<follow_request::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::store("begin_cancel_follow", e))?;

        let Some(request) = self
            .request_repo
            .find_by_id_for_update(&txn, request_id)
            .await?
        else {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_cancel_follow", e))?;
            return Err(AppError::NotFound("Follow request not found".to_string()));
        };

        if request.requester != requester.as_str() {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_cancel_follow", e))?;
            return Err(AppError::Forbidden(
                "Only the requester of a follow request may cancel it".to_string(),
            ));
        }

        let deleted = self.request_repo.delete_by_id(&txn, &request.id).await?;
        if deleted == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::store("rollback_cancel_follow", e))?;
            return Err(AppError::NotFound(
                "Follow request already resolved".to_string(),
            ));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::store("commit_cancel_follow", e))?;

        tracing::debug!(
            requester = %request.requester,
            target = %request.target,
            "Follow request cancelled"
        );

        Ok(request)
    }

    /// Dissolve whatever exists from `follower` toward `followee`.
    ///
    /// Withdraws a pending request if one is present, otherwise
    /// deletes the edge. Removing nothing is not an error.
    pub async fn remove_follower(
        &self,
        follower: &Identity,
        followee: &Identity,
    ) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::store("begin_remove_follower", e))?;

        let withdrawn = self
            .request_repo
            .delete_by_pair(&txn, follower.as_str(), followee.as_str())
            .await?;

        if withdrawn == 0 {
            self.edge_repo
                .delete_by_pair(&txn, follower.as_str(), followee.as_str())
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::store("commit_remove_follower", e))?;

        tracing::debug!(
            follower = %follower,
            followee = %followee,
            "Follow relationship removed"
        );

        Ok(())
    }

    /// Report the relationship from `follower` toward `followee`.
    ///
    /// A block in either direction voids the pair: the status reads
    /// as not found regardless of stored rows.
    pub async fn follow_status(
        &self,
        follower: &Identity,
        followee: &Identity,
    ) -> AppResult<FollowStatus> {
        let db = self.db.as_ref();

        if self
            .guard
            .is_blocked(db, follower.as_str(), followee.as_str())
            .await?
        {
            return Ok(FollowStatus::NotFound);
        }

        if let Some(edge) = self
            .edge_repo
            .find_by_pair(db, follower.as_str(), followee.as_str())
            .await?
        {
            return Ok(FollowStatus::Accepted {
                reblogs: edge.reblogs,
                notify: edge.notifications,
                accept_time: edge.created_at,
            });
        }

        if let Some(request) = self
            .request_repo
            .find_by_pair(db, follower.as_str(), followee.as_str())
            .await?
        {
            return Ok(FollowStatus::Pending {
                reblogs: request.wants_reblogs,
                notify: request.wants_notifications,
            });
        }

        Ok(FollowStatus::NotFound)
    }

    /// Find the pending request for a pair, if any.
    pub async fn find_request(
        &self,
        requester: &Identity,
        target: &Identity,
    ) -> AppResult<Option<follow_request::Model>> {
        self.request_repo
            .find_by_pair(self.db.as_ref(), requester.as_str(), target.as_str())
            .await
    }

    /// List pending requests a member has sent or received (paginated).
    pub async fn list_requests(
        &self,
        member: &Identity,
        kind: RequestKind,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<FollowRequestItem>> {
        let requests = match kind {
            RequestKind::Sent => {
                self.request_repo
                    .find_sent(self.db.as_ref(), member.as_str(), limit, until_id)
                    .await?
            }
            RequestKind::Received => {
                self.request_repo
                    .find_received(self.db.as_ref(), member.as_str(), limit, until_id)
                    .await?
            }
        };

        Ok(requests.into_iter().map(FollowRequestItem::from).collect())
    }

    /// Members that `member` follows (paginated).
    pub async fn list_following(
        &self,
        member: &Identity,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_edge::Model>> {
        self.edge_repo
            .find_following(self.db.as_ref(), member.as_str(), limit, until_id)
            .await
    }

    /// Members following `member` (paginated).
    pub async fn list_followers(
        &self,
        member: &Identity,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_edge::Model>> {
        self.edge_repo
            .find_followers(self.db.as_ref(), member.as_str(), limit, until_id)
            .await
    }

    /// Number of members following `member`.
    pub async fn count_followers(&self, member: &Identity) -> AppResult<u64> {
        self.edge_repo
            .count_followers(self.db.as_ref(), member.as_str())
            .await
    }

    /// Number of members `member` follows.
    pub async fn count_following(&self, member: &Identity) -> AppResult<u64> {
        self.edge_repo
            .count_following(self.db.as_ref(), member.as_str())
            .await
    }

    /// Classify a unique-constraint hit from a concurrent repeat.
    ///
    /// The constraint proves a row for the pair existed at insert
    /// time; a fresh read decides which shape it has.
    async fn repeat_outcome(
        &self,
        requester: &Identity,
        target: &Identity,
    ) -> AppResult<FollowOutcome> {
        if self
            .edge_repo
            .find_by_pair(self.db.as_ref(), requester.as_str(), target.as_str())
            .await?
            .is_some()
        {
            Ok(FollowOutcome::AlreadyFollowing)
        } else {
            Ok(FollowOutcome::AlreadyPending)
        }
    }
}

/// Per-edge delivery options carried by a follow request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowOptions {
    /// Whether reshares by the target appear in the requester's feed.
    pub reblogs: bool,
    /// Whether the requester is notified of the target's activity.
    pub notify: bool,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self {
            reblogs: true,
            notify: false,
        }
    }
}

/// Outcome of a follow request.
///
/// Repeats and vetoed requests resolve the call, so they are variants
/// here rather than errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FollowOutcome {
    /// The request resolved immediately into an edge.
    #[serde(rename_all = "camelCase")]
    Accepted {
        /// When the edge was created.
        accept_time: DateTimeWithTimeZone,
    },
    /// The request is waiting for the target's review.
    Pending {
        /// ID of the pending request.
        id: String,
    },
    /// An edge for this pair already exists.
    AlreadyFollowing,
    /// A pending request for this pair already exists.
    AlreadyPending,
    /// A block in either direction vetoed the request.
    Blocked,
}

/// Current relationship from one member toward another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FollowStatus {
    /// An active follow edge exists.
    #[serde(rename_all = "camelCase")]
    Accepted {
        reblogs: bool,
        notify: bool,
        accept_time: DateTimeWithTimeZone,
    },
    /// A request is pending the target's review.
    Pending { reblogs: bool, notify: bool },
    /// No relationship, or the pair is voided by a block.
    NotFound,
}

/// Which side of pending requests to list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Requests the member has filed.
    Sent,
    /// Requests awaiting the member's review.
    Received,
}

/// A pending follow request as reported to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequestItem {
    pub id: String,
    pub requester: String,
    pub target: String,
    pub wants_reblogs: bool,
    pub wants_notifications: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl From<follow_request::Model> for FollowRequestItem {
    fn from(model: follow_request::Model) -> Self {
        Self {
            id: model.id,
            requester: model.requester,
            target: model.target,
            wants_reblogs: model.wants_reblogs,
            wants_notifications: model.wants_notifications,
            created_at: model.created_at,
        }
    }
}
