//! ActivityPub federation for shelfmark-rs.
//!
//! This crate translates between local relationship state and the
//! actor-to-actor wire format:
//!
//! - **Activities**: Follow, Accept, Reject, Undo
//! - **IRIs**: canonical actor IRIs derived from normalized identities
//! - **Outbound**: pure builders from stored rows to wire activities
//! - **Inbound**: mapping verified activities onto the relationship
//!   engine
//!
//! Transport is not this crate's concern: inbound activities arrive
//! already parsed and signature-checked, and outbound activities are
//! handed to an external delivery collaborator.

pub mod activities;
pub mod inbound;
pub mod iri;
pub mod outbound;

pub use activities::*;
pub use inbound::InboundTranslator;
pub use iri::{actor_iri, identity_from_iri};
pub use outbound::OutboundTranslator;
