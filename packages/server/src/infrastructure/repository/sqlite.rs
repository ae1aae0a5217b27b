//! SQLite MessageStore 実装
//!
//! 1 プロセスにつき 1 つの接続を開き、Mutex で直列化します。
//! rusqlite はブロッキング API なので、全ての操作は `spawn_blocking` 上で実行します。

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chatroom_shared::time::{parse_rfc3339, to_rfc3339};
use rusqlite::{Connection, params};

use crate::domain::{
    Attachment, ChatMessage, HistoryLimit, MessageStore, PresentationColor, StoreError, Timestamp,
};

const CREATE_MESSAGES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        text TEXT NOT NULL,
        time TEXT NOT NULL,
        color TEXT NOT NULL,
        file_url TEXT,
        file_name TEXT,
        file_size INTEGER,
        is_file BOOLEAN NOT NULL DEFAULT 0
    )";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// One row of the `messages` table, before validation
struct MessageRow {
    username: String,
    text: String,
    time: String,
    color: String,
    file_url: Option<String>,
    file_name: Option<String>,
    file_size: Option<i64>,
    is_file: bool,
}

impl TryFrom<MessageRow> for ChatMessage {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let time = parse_rfc3339(&row.time)
            .map_err(|e| StoreError::CorruptRow(format!("time '{}': {e}", row.time)))?;
        let color = PresentationColor::new(row.color)
            .map_err(|e| StoreError::CorruptRow(e.to_string()))?;

        if !row.is_file {
            return Ok(ChatMessage::text(
                row.username,
                row.text,
                color,
                Timestamp::new(time),
            ));
        }

        let url = row
            .file_url
            .ok_or_else(|| StoreError::CorruptRow("file message without file_url".into()))?;
        let size_bytes = u64::try_from(row.file_size.unwrap_or(0))
            .map_err(|e| StoreError::CorruptRow(format!("file_size: {e}")))?;
        let attachment = Attachment {
            url,
            original_name: row.file_name.unwrap_or_default(),
            size_bytes,
        };
        Ok(ChatMessage {
            sender: row.username,
            body: row.text,
            timestamp: Timestamp::new(time),
            color,
            attachment: Some(attachment),
        })
    }
}

/// SQLite を使った MessageStore 実装
#[derive(Clone)]
pub struct SqliteMessageStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMessageStore {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(CREATE_MESSAGES_TABLE, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let message = message.clone();
        self.with_connection(move |conn| {
            let attachment = message.attachment.as_ref();
            conn.execute(
                "INSERT INTO messages
                 (username, text, time, color, file_url, file_name, file_size, is_file)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    message.sender,
                    message.body,
                    to_rfc3339(&message.timestamp.value()),
                    message.color.as_str(),
                    attachment.map(|a| a.url.as_str()),
                    attachment.map(|a| a.original_name.as_str()),
                    attachment.map(|a| i64::try_from(a.size_bytes).unwrap_or(i64::MAX)),
                    message.is_file(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn recent(&self, limit: HistoryLimit) -> Result<Vec<ChatMessage>, StoreError> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT username, text, time, color, file_url, file_name, file_size, is_file
                 FROM messages
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![i64::from(limit.value())], |row| {
                    Ok(MessageRow {
                        username: row.get(0)?,
                        text: row.get(1)?,
                        time: row.get(2)?,
                        color: row.get(3)?,
                        file_url: row.get(4)?,
                        file_name: row.get(5)?,
                        file_size: row.get(6)?,
                        is_file: row.get(7)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            // newest first from the query, callers want oldest first
            rows.into_iter()
                .rev()
                .map(ChatMessage::try_from)
                .collect::<Result<Vec<_>, _>>()
        })
        .await
    }
}
