//! Repository traits defined by the domain layer.
//!
//! Infrastructure provides the implementations; use cases depend only on
//! these traits.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{entity::ChatMessage, error::StoreError, value_object::HistoryLimit};

/// Durable append-only log of chat messages.
///
/// Implementations must be safe to share between session tasks and serialize
/// conflicting writes internally.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message.
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// Up to `limit` most recent messages, oldest first.
    async fn recent(&self, limit: HistoryLimit) -> Result<Vec<ChatMessage>, StoreError>;
}
