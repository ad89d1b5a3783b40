//! Follow edge repository.

use crate::entities::{follow_edge, FollowEdge};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use shelfmark_common::{AppError, AppResult};

/// Follow edge repository for database operations.
///
/// Methods are generic over [`ConnectionTrait`] so the same operation
/// runs on the pool or inside a caller-owned transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FollowEdgeRepository;

impl FollowEdgeRepository {
    /// Create a new follow edge repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a follow edge by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<follow_edge::Model>> {
        FollowEdge::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_follow_edge_by_id", e))
    }

    /// Find a follow edge by requester and target.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        requester: &str,
        target: &str,
    ) -> AppResult<Option<follow_edge::Model>> {
        FollowEdge::find()
            .filter(follow_edge::Column::Requester.eq(requester))
            .filter(follow_edge::Column::Target.eq(target))
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_follow_edge_by_pair", e))
    }

    /// Create a new follow edge.
    ///
    /// The unique (requester, target) constraint is the arbiter for
    /// concurrent duplicates; a violation surfaces as
    /// [`AppError::Duplicate`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow_edge::ActiveModel,
    ) -> AppResult<follow_edge::Model> {
        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Duplicate("follow edge already exists for pair".to_string())
            }
            _ => AppError::store("insert_follow_edge", e),
        })
    }

    /// Delete a follow edge by pair, returning the affected row count.
    pub async fn delete_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        requester: &str,
        target: &str,
    ) -> AppResult<u64> {
        FollowEdge::delete_many()
            .filter(follow_edge::Column::Requester.eq(requester))
            .filter(follow_edge::Column::Target.eq(target))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::store("delete_follow_edge_by_pair", e))
    }

    /// Get members that a member is following (paginated).
    pub async fn find_following<C: ConnectionTrait>(
        &self,
        conn: &C,
        handle: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_edge::Model>> {
        let mut query = FollowEdge::find()
            .filter(follow_edge::Column::Requester.eq(handle))
            .order_by_desc(follow_edge::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow_edge::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::store("find_following", e))
    }

    /// Get members that are following a member (paginated).
    pub async fn find_followers<C: ConnectionTrait>(
        &self,
        conn: &C,
        handle: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow_edge::Model>> {
        let mut query = FollowEdge::find()
            .filter(follow_edge::Column::Target.eq(handle))
            .order_by_desc(follow_edge::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow_edge::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::store("find_followers", e))
    }

    /// Count followers of a member.
    pub async fn count_followers<C: ConnectionTrait>(
        &self,
        conn: &C,
        handle: &str,
    ) -> AppResult<u64> {
        FollowEdge::find()
            .filter(follow_edge::Column::Target.eq(handle))
            .count(conn)
            .await
            .map_err(|e| AppError::store("count_followers", e))
    }

    /// Count members a member is following.
    pub async fn count_following<C: ConnectionTrait>(
        &self,
        conn: &C,
        handle: &str,
    ) -> AppResult<u64> {
        FollowEdge::find()
            .filter(follow_edge::Column::Requester.eq(handle))
            .count(conn)
            .await
            .map_err(|e| AppError::store("count_following", e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_edge(id: &str, requester: &str, target: &str) -> follow_edge::Model {
        follow_edge::Model {
            id: id.to_string(),
            requester: requester.to_string(),
            target: target.to_string(),
            reblogs: true,
            notifications: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_edge("e1", "alice@books.example", "bob@books.example");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[edge.clone()]])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let result = repo
            .find_by_pair(&db, "alice@books.example", "bob@books.example")
            .await
            .unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.requester, "alice@books.example");
        assert_eq!(found.target, "bob@books.example");
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<follow_edge::Model>::new()])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let result = repo
            .find_by_pair(&db, "alice@books.example", "carol@books.example")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let edge = create_test_edge("e1", "alice@books.example", "bob@books.example");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[edge.clone()]])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let result = repo
            .create(
                &db,
                follow_edge::ActiveModel {
                    id: Set(edge.id),
                    requester: Set(edge.requester),
                    target: Set(edge.target),
                    reblogs: Set(true),
                    notifications: Set(false),
                    created_at: Set(edge.created_at),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.id, "e1");
    }

    #[tokio::test]
    async fn test_delete_by_pair_reports_row_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let deleted = repo
            .delete_by_pair(&db, "alice@books.example", "bob@books.example")
            .await
            .unwrap();

        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_delete_by_pair_missing_row_is_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let deleted = repo
            .delete_by_pair(&db, "alice@books.example", "nobody@books.example")
            .await
            .unwrap();

        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_find_followers() {
        let e1 = create_test_edge("e1", "bob@books.example", "alice@books.example");
        let e2 = create_test_edge("e2", "carol@books.example", "alice@books.example");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[e1, e2]])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let result = repo
            .find_followers(&db, "alice@books.example", 10, None)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_followers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(3))
            }]])
            .into_connection();

        let repo = FollowEdgeRepository::new();
        let count = repo.count_followers(&db, "alice@books.example").await.unwrap();

        assert_eq!(count, 3);
    }
}
