//! Follow request repository.

use crate::entities::{follow_request, FollowRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use shelfmark_common::{AppError, AppResult};

/// Follow request repository for database operations.
///
/// Methods are generic over [`ConnectionTrait`] so the same operation
/// runs on the pool or inside a caller-owned transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FollowRequestRepository;

impl FollowRequestRepository {
    /// Create a new follow request repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a follow request by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_follow_request_by_id", e))
    }

    /// Find a follow request by ID, taking a row lock.
    ///
    /// Used by the promotion path so two terminal operations on the same
    /// request serialize on the row instead of racing.
    pub async fn find_by_id_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_follow_request_for_update", e))
    }

    /// Find a follow request by requester and target.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        requester: &str,
        target: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::Requester.eq(requester))
            .filter(follow_request::Column::Target.eq(target))
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_follow_request_by_pair", e))
    }

    /// Create a new follow request.
    ///
    /// The unique (requester, target) constraint is the arbiter for
    /// concurrent duplicates; a violation surfaces as
    /// [`AppError::Duplicate`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow_request::ActiveModel,
    ) -> AppResult<follow_request::Model> {
        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Duplicate("follow request already exists for pair".to_string())
            }
            _ => AppError::store("insert_follow_request", e),
        })
    }

    /// Delete a follow request by ID, returning the affected row count.
    ///
    /// Zero rows means a concurrent accept/reject/cancel already
    /// resolved the request.
    pub async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<u64> {
        FollowRequest::delete_many()
            .filter(follow_request::Column::Id.eq(id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::store("delete_follow_request_by_id", e))
    }

    /// Delete a follow request by pair, returning the affected row count.
    pub async fn delete_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        requester: &str,
        target: &str,
    ) -> AppResult<u64> {
        FollowRequest::delete_many()
            .filter(follow_request::Column::Requester.eq(requester))
            .filter(follow_request::Column::Target.eq(target))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::store("delete_follow_request_by_pair", e))
    }

    /// Get requests a member has sent (paginated).
    pub async fn find_sent<C: ConnectionTrait>(
        &self,
        conn: &C,
        requester: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_request::Model>> {
        let mut query = FollowRequest::find()
            .filter(follow_request::Column::Requester.eq(requester))
            .order_by_desc(follow_request::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow_request::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::store("find_sent_follow_requests", e))
    }

    /// Get requests a member has received (paginated).
    pub async fn find_received<C: ConnectionTrait>(
        &self,
        conn: &C,
        target: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_request::Model>> {
        let mut query = FollowRequest::find()
            .filter(follow_request::Column::Target.eq(target))
            .order_by_desc(follow_request::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow_request::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::store("find_received_follow_requests", e))
    }
}
