//! HTTP / WebSocket surface of the chat relay.

mod handler;
mod runner;
mod signal;
pub mod state; // UseCase を組み立てるため public

pub use runner::{build_app, run, serve};
pub use signal::shutdown_signal;
