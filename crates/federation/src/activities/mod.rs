//! `ActivityPub` activity types.

#![allow(missing_docs)]

mod accept;
mod follow;
mod reject;
mod undo;

pub use accept::AcceptActivity;
pub use follow::FollowActivity;
pub use reject::RejectActivity;
pub use undo::UndoActivity;
