//! Block repository.

use crate::entities::{block, Block};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use shelfmark_common::{AppError, AppResult};

/// Block repository for database operations.
///
/// Methods are generic over [`ConnectionTrait`] so the same operation
/// runs on the pool or inside a caller-owned transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockRepository;

impl BlockRepository {
    /// Create a new block repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a block by blocker and blocked.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        blocker: &str,
        blocked: &str,
    ) -> AppResult<Option<block::Model>> {
        Block::find()
            .filter(block::Column::Blocker.eq(blocker))
            .filter(block::Column::Blocked.eq(blocked))
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_block_by_pair", e))
    }

    /// Find a block in either direction between two members.
    ///
    /// A single query so the check can run inside the caller's mutation
    /// transaction without a read gap between the two directions.
    pub async fn find_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_a: &str,
        member_b: &str,
    ) -> AppResult<Option<block::Model>> {
        Block::find()
            .filter(
                // A blocks B or B blocks A
                sea_orm::Condition::any()
                    .add(
                        sea_orm::Condition::all()
                            .add(block::Column::Blocker.eq(member_a))
                            .add(block::Column::Blocked.eq(member_b)),
                    )
                    .add(
                        sea_orm::Condition::all()
                            .add(block::Column::Blocker.eq(member_b))
                            .add(block::Column::Blocked.eq(member_a)),
                    ),
            )
            .one(conn)
            .await
            .map_err(|e| AppError::store("find_block_between", e))
    }

    /// Check if a block exists in either direction.
    pub async fn is_blocked_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_a: &str,
        member_b: &str,
    ) -> AppResult<bool> {
        Ok(self.find_between(conn, member_a, member_b).await?.is_some())
    }

    /// Create a new block.
    ///
    /// The unique (blocker, blocked) constraint is the arbiter for
    /// concurrent duplicates; a violation surfaces as
    /// [`AppError::Duplicate`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: block::ActiveModel,
    ) -> AppResult<block::Model> {
        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Duplicate("block already exists for pair".to_string())
            }
            _ => AppError::store("insert_block", e),
        })
    }

    /// Delete a block by pair, returning the affected row count.
    pub async fn delete_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        blocker: &str,
        blocked: &str,
    ) -> AppResult<u64> {
        Block::delete_many()
            .filter(block::Column::Blocker.eq(blocker))
            .filter(block::Column::Blocked.eq(blocked))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::store("delete_block_by_pair", e))
    }

    /// Get members a member is blocking (paginated).
    pub async fn find_blocking<C: ConnectionTrait>(
        &self,
        conn: &C,
        blocker: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<block::Model>> {
        let mut query = Block::find()
            .filter(block::Column::Blocker.eq(blocker))
            .order_by_desc(block::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(block::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::store("find_blocking", e))
    }
}
