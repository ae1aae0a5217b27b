//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Default number of messages replayed on join and returned by the history endpoint
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Display name used when an upload does not carry one
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// Connection identifier value object.
///
/// Identifies one live connection in the registry. Never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a ConnectionId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display color assigned to a connection, e.g. `#3366cc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationColor(String);

impl PresentationColor {
    /// Create a new PresentationColor.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::PresentationColorEmpty` for an empty string
    pub fn new(color: impl Into<String>) -> Result<Self, ValueObjectError> {
        let color = color.into();
        if color.trim().is_empty() {
            return Err(ValueObjectError::PresentationColorEmpty);
        }
        Ok(Self(color))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresentationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned receipt time of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a Timestamp from a UTC date-time.
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Stamp the current server time.
    pub fn now() -> Self {
        Self(chatroom_shared::time::now_utc())
    }

    /// Get the inner date-time value.
    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", chatroom_shared::time::to_rfc3339(&self.0))
    }
}

/// Number of most recent messages to fetch from the store.
///
/// Always positive. Non-positive or unparseable input falls back to a
/// configured default instead of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HistoryLimit(u32);

impl HistoryLimit {
    /// Create a new HistoryLimit.
    ///
    /// Values above `u32::MAX` are clamped.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::HistoryLimitNotPositive` for `value <= 0`
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if value <= 0 {
            return Err(ValueObjectError::HistoryLimitNotPositive(value));
        }
        Ok(Self(value.min(i64::from(u32::MAX)) as u32))
    }

    /// Use `value` when it is positive, `default` otherwise.
    pub fn or_default(value: i64, default: HistoryLimit) -> Self {
        Self::new(value).unwrap_or(default)
    }

    /// Parse an optional client-supplied string (e.g. a `limit` query parameter).
    pub fn parse_or(raw: Option<&str>, default: HistoryLimit) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|v| Self::new(v).ok())
            .unwrap_or(default)
    }

    /// Get the inner value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_LIMIT)
    }
}

impl fmt::Display for HistoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
