//! Shared utilities for the chatroom relay server.

pub mod logger;
pub mod time;
