//! Member repository.

use crate::entities::{member, Member};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, SqlErr};
use shelfmark_common::{AppError, AppResult};

/// Member repository for database operations.
///
/// Methods are generic over [`ConnectionTrait`] so the same lookup runs
/// on the pool or inside a caller-owned transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemberRepository;

impl MemberRepository {
    /// Create a new member repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a member by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<member::Model>> {
        Member::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_member_by_id", e))
    }

    /// Find a member by normalized handle.
    pub async fn find_by_handle<C: ConnectionTrait>(
        &self,
        conn: &C,
        handle: &str,
    ) -> AppResult<Option<member::Model>> {
        Member::find()
            .filter(member::Column::Handle.eq(handle))
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_member_by_handle", e))
    }

    /// Create a new member row.
    ///
    /// Account provisioning is owned by an external layer; this write
    /// exists for fixtures and tests.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: member::ActiveModel,
    ) -> AppResult<member::Model> {
        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Duplicate("member handle already registered".to_string())
            }
            _ => AppError::store("insert_member", e),
        })
    }
}
