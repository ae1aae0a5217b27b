//! InMemory MessageStore 実装
//!
//! Vec をインメモリ DB として使用します。プロセス終了で内容は失われます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryLimit, MessageStore, StoreError};

/// インメモリ MessageStore 実装
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みメッセージ数
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }

    async fn recent(&self, limit: HistoryLimit) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let skip = messages.len().saturating_sub(limit.value() as usize);
        Ok(messages[skip..].to_vec())
    }
}
