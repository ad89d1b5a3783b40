//! Business logic services.

#![allow(missing_docs)]

pub mod auto_accept;
pub mod block;
pub mod block_guard;
pub mod follow;
pub mod identity;

pub use auto_accept::AutoAcceptPolicy;
pub use block::BlockService;
pub use block_guard::BlockGuard;
pub use follow::{
    FollowOptions, FollowOutcome, FollowRequestItem, FollowService, FollowStatus, RequestKind,
};
pub use identity::IdentityResolver;
