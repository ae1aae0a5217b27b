//! Per-connection session lifecycle.

use super::error::SessionStateError;

/// Lifecycle of one client connection.
///
/// ```text
/// Connecting -> Registered -> Streaming -> Closed
///                   |                         ^
///                   +-------------------------+  (replay write failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport upgrade in progress
    Connecting,
    /// In the registry with a color; history replay pending
    Registered,
    /// Receive loop running
    Streaming,
    /// Terminal
    Closed,
}

impl SessionState {
    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(self, next: SessionState) -> Result<SessionState, SessionStateError> {
        use SessionState::*;

        match (self, next) {
            (Connecting, Registered)
            | (Connecting, Closed)
            | (Registered, Streaming)
            | (Registered, Closed)
            | (Streaming, Closed) => Ok(next),
            (from, to) => Err(SessionStateError { from, to }),
        }
    }
}
