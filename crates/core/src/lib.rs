//! Relationship engine for shelfmark-rs.
//!
//! Owns the follow/block state machine: follow requests, their
//! promotion to follow edges, and the block guard that vetoes new
//! relationships. All state transitions run inside a single database
//! transaction and report their outcome as data rather than errors.

pub mod services;

pub use services::*;
