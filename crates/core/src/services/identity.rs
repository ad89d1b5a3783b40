//! Identity resolution service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use shelfmark_common::{AppError, AppResult, Identity};
use shelfmark_db::{entities::member, repositories::MemberRepository};

/// Resolves normalized identities to member records.
///
/// Relationship rows key on the handle itself, so resolution is only
/// needed where an operation must confirm the member actually exists
/// (e.g. the target of a new follow request).
#[derive(Clone)]
pub struct IdentityResolver {
    db: Arc<DatabaseConnection>,
    member_repo: MemberRepository,
}

impl IdentityResolver {
    /// Create a new identity resolver.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, member_repo: MemberRepository) -> Self {
        Self { db, member_repo }
    }

    /// Look up the member record for an identity.
    pub async fn resolve(&self, identity: &Identity) -> AppResult<Option<member::Model>> {
        self.member_repo
            .find_by_handle(self.db.as_ref(), identity.as_str())
            .await
    }

    /// Look up the member record for an identity, failing if unknown.
    pub async fn resolve_required(&self, identity: &Identity) -> AppResult<member::Model> {
        self.resolve(identity).await?.ok_or_else(|| {
            AppError::NotFound(format!("No member found for identity: {identity}"))
        })
    }
}
