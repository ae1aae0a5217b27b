//! Real-time chat relay.
//!
//! Browsers connect over WebSocket, receive recent history on join and get
//! every chat message and file notice fanned out to them. Messages are
//! persisted to SQLite.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::Config;
pub use error::ServerError;
pub use ui::{run, serve};
