//! Bidirectional, message-oriented connection to one client.
//!
//! The WebSocket handler implements these traits; the session use case is
//! written against them so it can run over any transport.

use async_trait::async_trait;

use super::{entity::ChatMessage, entity::IncomingMessage, error::TransportError};

/// One read from a client
#[derive(Debug)]
pub enum Inbound {
    /// A decoded chat message
    Message(IncomingMessage),
    /// Keep-alive traffic (ping/pong); proves the peer is alive
    Heartbeat,
    /// The peer closed the connection
    Closed,
}

/// Outbound half of a client connection
#[async_trait]
pub trait MessageSink: Send {
    /// Serialize and write one message.
    async fn send_json(&mut self, message: &ChatMessage) -> Result<(), TransportError>;

    /// Send a keep-alive ping.
    async fn ping(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Close the connection. Errors are ignored; the peer may already be gone.
    async fn close(&mut self);
}

/// Inbound half of a client connection
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next inbound frame.
    async fn receive(&mut self) -> Result<Inbound, TransportError>;
}
