//! Common utilities and shared types for shelfmark-rs.
//!
//! This crate provides foundational components used across all shelfmark-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Identity**: Normalized `name@domain` member handles via [`Identity`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Time**: Injectable time source via [`Clock`]
//!
//! # Example
//!
//! ```no_run
//! use shelfmark_common::{AppResult, Identity, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     let reader = Identity::parse("alice@books.example")?;
//!     println!("{id} belongs to {reader}");
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod identity;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use identity::Identity;
