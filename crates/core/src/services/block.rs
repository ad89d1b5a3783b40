//! Block service.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, Set};
use shelfmark_common::{AppError, AppResult, Clock, IdGenerator, Identity};
use shelfmark_db::{entities::block, repositories::BlockRepository};

/// Block service for managing block rows.
///
/// Blocks only veto future relationships; existing edges and requests
/// stay in the store and are voided at read time by the guard. A block
/// row needs no member lookup, so a member can block an identity whose
/// record this instance no longer holds.
#[derive(Clone)]
pub struct BlockService {
    db: Arc<DatabaseConnection>,
    block_repo: BlockRepository,
    id_gen: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl BlockService {
    /// Create a new block service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            block_repo: BlockRepository::new(),
            id_gen: IdGenerator::new(),
            clock,
        }
    }

    /// Block a member. Blocking an already blocked member succeeds.
    pub async fn block(&self, blocker: &Identity, blocked: &Identity) -> AppResult<()> {
        if blocker == blocked {
            return Err(AppError::InvalidInput("Cannot block yourself".to_string()));
        }

        let model = block::ActiveModel {
            id: Set(self.id_gen.generate()),
            blocker: Set(blocker.as_str().to_string()),
            blocked: Set(blocked.as_str().to_string()),
            created_at: Set(self.clock.now().into()),
        };

        match self.block_repo.create(self.db.as_ref(), model).await {
            Ok(_) | Err(AppError::Duplicate(_)) => {
                tracing::debug!(blocker = %blocker, blocked = %blocked, "Member blocked");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Unblock a member.
    pub async fn unblock(&self, blocker: &Identity, blocked: &Identity) -> AppResult<()> {
        let deleted = self
            .block_repo
            .delete_by_pair(self.db.as_ref(), blocker.as_str(), blocked.as_str())
            .await?;

        if deleted == 0 {
            return Err(AppError::NotFound("Not blocking this member".to_string()));
        }

        tracing::debug!(blocker = %blocker, blocked = %blocked, "Member unblocked");
        Ok(())
    }

    /// Whether a block exists in either direction between two members.
    pub async fn is_blocked_between(
        &self,
        member_a: &Identity,
        member_b: &Identity,
    ) -> AppResult<bool> {
        self.block_repo
            .is_blocked_between(self.db.as_ref(), member_a.as_str(), member_b.as_str())
            .await
    }

    /// Members that `blocker` is blocking (paginated).
    pub async fn list_blocks(
        &self,
        blocker: &Identity,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<block::Model>> {
        self.block_repo
            .find_blocking(self.db.as_ref(), blocker.as_str(), limit, until_id)
            .await
    }
}
