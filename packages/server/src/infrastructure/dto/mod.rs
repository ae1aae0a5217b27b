//! Data transfer objects for the HTTP and WebSocket surfaces.

pub mod http;
pub mod websocket;

pub use http::{ErrorDto, HealthDto, HistoryQuery};
pub use websocket::{ChatMessageDto, InboundMessageDto};
