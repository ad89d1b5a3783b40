//! Block guard service.

use sea_orm::ConnectionTrait;
use shelfmark_common::AppResult;
use shelfmark_db::repositories::BlockRepository;

/// Veto check consulted before any new relationship is written.
///
/// A block in either direction forbids new follow requests and edges.
/// Callers pass their own connection so the check runs inside the same
/// transaction as the write it protects.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockGuard {
    block_repo: BlockRepository,
}

impl BlockGuard {
    /// Create a new block guard.
    #[must_use]
    pub const fn new(block_repo: BlockRepository) -> Self {
        Self { block_repo }
    }

    /// Whether a block exists between the two members, in either direction.
    pub async fn is_blocked<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_a: &str,
        member_b: &str,
    ) -> AppResult<bool> {
        self.block_repo
            .is_blocked_between(conn, member_a, member_b)
            .await
    }
}
