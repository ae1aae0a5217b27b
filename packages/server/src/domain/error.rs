//! Domain layer error definitions.

use thiserror::Error;

use super::session::SessionState;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PresentationColor validation error
    #[error("PresentationColor cannot be empty")]
    PresentationColorEmpty,

    /// History limit must be a positive integer
    #[error("History limit must be positive (got {0})")]
    HistoryLimitNotPositive(i64),
}

/// Errors raised by a [`MessageStore`](super::MessageStore) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted row could not be mapped back into a message
    #[error("stored row is corrupt: {0}")]
    CorruptRow(String),

    /// The store cannot be reached (lock poisoned, worker task died)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors on an established bidirectional connection.
///
/// Every variant is fatal for the connection it occurred on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to write to connection: {0}")]
    Write(String),

    #[error("failed to read from connection: {0}")]
    Read(String),

    #[error("undecodable inbound payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("connection stalled for {0:?}")]
    TimedOut(std::time::Duration),
}

/// Illegal session lifecycle transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid session transition: {from:?} -> {to:?}")]
pub struct SessionStateError {
    pub from: SessionState,
    pub to: SessionState,
}
