//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Query string of `GET /history`.
///
/// `limit` is kept as a raw string so that unparseable values fall back to
/// the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Number of live connections
    pub connections: usize,
    /// Messages waiting in the broadcast intake
    pub queue_depth: usize,
}

/// Error body returned by the HTTP handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
