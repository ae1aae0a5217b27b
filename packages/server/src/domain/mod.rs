//! Domain layer for the chat relay.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod palette;
pub mod repository;
pub mod session;
pub mod transport;
pub mod value_object;

pub use entity::{Attachment, ChatMessage, IncomingMessage};
pub use error::{SessionStateError, StoreError, TransportError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use palette::{ColorPalette, upload_color};
pub use repository::MessageStore;
#[cfg(test)]
pub use repository::MockMessageStore;
pub use session::SessionState;
pub use transport::{Inbound, MessageSink, MessageSource};
pub use value_object::{ConnectionId, HistoryLimit, PresentationColor, Timestamp};
