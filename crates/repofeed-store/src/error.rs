//! Error types for entity store operations.

use repofeed_core::RepoId;
use thiserror::Error;

/// Primary error type for store operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The id has never been ingested, or its entry was already reclaimed.
    #[error("unknown entity")]
    UnknownEntity {
        /// Identifier that was not found.
        id: RepoId,
    },
    /// A release was issued without a matching acquire. Programming error.
    #[error("refcount underflow")]
    RefcountUnderflow {
        /// Identifier whose refcount would have gone negative.
        id: RepoId,
    },
}

/// Convenience alias for store operation results.
pub type StoreResult<T> = Result<T, StoreError>;
