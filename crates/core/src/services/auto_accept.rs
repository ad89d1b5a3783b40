//! Auto-accept policy service.

use sea_orm::ConnectionTrait;
use shelfmark_common::{AppResult, Identity};
use shelfmark_db::repositories::MemberRepository;

/// Decides whether a new follow request skips the pending state.
///
/// Auto-accept is a preference of the target member and only applies
/// to members of this instance. Requests toward remote targets always
/// enter the pending state and resolve when the remote side answers.
#[derive(Clone, Debug)]
pub struct AutoAcceptPolicy {
    member_repo: MemberRepository,
    local_domain: String,
}

impl AutoAcceptPolicy {
    /// Create a new auto-accept policy for the given local domain.
    #[must_use]
    pub const fn new(member_repo: MemberRepository, local_domain: String) -> Self {
        Self {
            member_repo,
            local_domain,
        }
    }

    /// Whether a request toward `target` should resolve immediately.
    ///
    /// Unknown local targets fall back to manual review; the missing
    /// row is the caller's problem, not this policy's.
    pub async fn should_auto_accept<C: ConnectionTrait>(
        &self,
        conn: &C,
        target: &Identity,
    ) -> AppResult<bool> {
        if !target.is_local(&self.local_domain) {
            return Ok(false);
        }

        Ok(self
            .member_repo
            .find_by_handle(conn, target.as_str())
            .await?
            .is_some_and(|member| member.auto_accept_follows))
    }
}
