//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod upload;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_history, health_check, index};
pub use upload::upload_file;

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
