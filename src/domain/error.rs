//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::ItemId;

/// Violations of the store's structural rules.
///
/// Every mutation validates before it touches the store, so a returned
/// error always means nothing was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("element with id \"{0}\" already exists")]
    DuplicateId(ItemId),

    #[error("element with id \"{0}\" not found")]
    NotFound(ItemId),

    #[error("parent element with id \"{0}\" not found")]
    ParentNotFound(ItemId),

    #[error("cycle detected in hierarchy at id \"{0}\"")]
    CycleDetected(ItemId),
}

/// Result type for store operations.
pub type DomainResult<T> = Result<T, DomainError>;
