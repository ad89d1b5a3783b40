//! Repository layer over the entities.

pub mod block;
pub mod follow_edge;
pub mod follow_request;
pub mod member;

pub use block::BlockRepository;
pub use follow_edge::FollowEdgeRepository;
pub use follow_request::FollowRequestRepository;
pub use member::MemberRepository;
