//! `SeaORM` entity definitions.

pub mod block;
pub mod follow_edge;
pub mod follow_request;
pub mod member;

pub use block::Entity as Block;
pub use follow_edge::Entity as FollowEdge;
pub use follow_request::Entity as FollowRequest;
pub use member::Entity as Member;
