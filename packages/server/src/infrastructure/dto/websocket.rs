//! Wire format of chat messages.
//!
//! The same JSON object is used on the WebSocket, in the history endpoint and
//! in the upload response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, IncomingMessage};

/// Chat message as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub username: String,
    pub text: String,
    /// RFC 3339
    pub time: DateTime<Utc>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    pub is_file: bool,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        let attachment = message.attachment.as_ref();
        Self {
            username: message.sender.clone(),
            text: message.body.clone(),
            time: message.timestamp.value(),
            color: message.color.as_str().to_string(),
            file_url: attachment.map(|a| a.url.clone()),
            file_name: attachment.map(|a| a.original_name.clone()),
            // an empty file carries no size on the wire
            file_size: attachment.map(|a| a.size_bytes).filter(|size| *size > 0),
            is_file: message.is_file(),
        }
    }
}

/// Chat message as received from a client.
///
/// Only the name and the text are read. Time, color and file fields sent by
/// the client are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessageDto {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<InboundMessageDto> for IncomingMessage {
    fn from(dto: InboundMessageDto) -> Self {
        Self {
            sender: dto.username.unwrap_or_default(),
            body: dto.text.unwrap_or_default(),
        }
    }
}
