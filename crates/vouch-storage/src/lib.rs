//! Storage abstraction for vouch.
//!
//! Backend crates (vouch-store-sqlite, vouch-store-memory) implement the
//! [`Store`] trait so `vouch-core` doesn't depend on any specific database
//! engine or schema details.

mod store;
mod types;

pub use store::Store;
#[cfg(feature = "test-support")]
pub use store::MockStore;
pub use types::*;

use thiserror::Error;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    /// A conditional update lost the race (e.g. the invitation was no
    /// longer pending when the transition ran).
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}
