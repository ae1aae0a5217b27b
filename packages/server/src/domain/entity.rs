//! Core domain models for the chat relay.

use super::value_object::{ANONYMOUS_USERNAME, PresentationColor, Timestamp};

/// A file that was uploaded and announced in the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Public URL the file is served from (e.g. `/uploads/<uuid>.txt`)
    pub url: String,
    /// File name as supplied by the uploader
    pub original_name: String,
    /// Size of the stored file in bytes
    pub size_bytes: u64,
}

/// A chat event.
///
/// Only constructed by the server at receipt time, so the timestamp and color
/// are always server-assigned. A message is a file notice exactly when it
/// carries an [`Attachment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display name of the sender
    pub sender: String,
    /// Free-form text, empty for file notices
    pub body: String,
    /// Server receipt time
    pub timestamp: Timestamp,
    /// Color of the sending connection
    pub color: PresentationColor,
    /// Present iff the message announces an uploaded file
    pub attachment: Option<Attachment>,
}

impl ChatMessage {
    /// Create a text message
    pub fn text(
        sender: String,
        body: String,
        color: PresentationColor,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender,
            body,
            timestamp,
            color,
            attachment: None,
        }
    }

    /// Create a file notice. An empty sender becomes [`ANONYMOUS_USERNAME`].
    pub fn file(
        sender: String,
        attachment: Attachment,
        color: PresentationColor,
        timestamp: Timestamp,
    ) -> Self {
        let sender = if sender.trim().is_empty() {
            ANONYMOUS_USERNAME.to_string()
        } else {
            sender
        };
        Self {
            sender,
            body: String::new(),
            timestamp,
            color,
            attachment: Some(attachment),
        }
    }

    /// Whether this message announces an uploaded file
    pub fn is_file(&self) -> bool {
        self.attachment.is_some()
    }
}

/// What a client sent over its connection, before the server stamps it.
///
/// Clients cannot supply a time, a color or an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingMessage {
    pub sender: String,
    pub body: String,
}

impl IncomingMessage {
    /// Stamp the message with the receiving connection's color and the current time
    pub fn stamp(self, color: &PresentationColor, timestamp: Timestamp) -> ChatMessage {
        ChatMessage::text(self.sender, self.body, color.clone(), timestamp)
    }
}
