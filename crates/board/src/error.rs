use store::StoreError;
use thiserror::Error;

/// Failure taxonomy of the board. Every variant is terminal for the action
/// that triggered it: nothing here retries, queues or backs off — the next
/// snapshot from the store is the source of truth.
#[derive(Debug, Error)]
pub enum BoardError {
    /// No user context; the board shows a placeholder and performs no
    /// store calls.
    #[error("not authenticated")]
    Unauthenticated,
    /// The role does not grant the attempted capability.
    #[error("permission denied: {0}")]
    Forbidden(String),
    /// Rejected before any store call was made; local state unchanged.
    #[error("{0}")]
    Validation(String),
    /// The store reported the operation failed; local state unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
