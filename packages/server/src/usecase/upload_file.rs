//! UseCase: ファイルアップロード処理
//!
//! アップロードされたファイルを保存し、ファイル通知メッセージとして
//! WebSocket と同じ保存・配信経路に流す。

use crate::{
    domain::{Attachment, ChatMessage, Timestamp, upload_color},
    infrastructure::storage::UploadStorage,
};

use super::{error::UploadError, send_message::SendMessageUseCase};

/// ファイルアップロードのユースケース
#[derive(Clone)]
pub struct UploadFileUseCase {
    storage: UploadStorage,
    send: SendMessageUseCase,
}

impl UploadFileUseCase {
    pub fn new(storage: UploadStorage, send: SendMessageUseCase) -> Self {
        Self { storage, send }
    }

    /// ファイルアップロードを実行
    ///
    /// 1. `<uuid><拡張子>` の名前でディスクに保存
    /// 2. ファイル通知メッセージを作成（色は固定、空のユーザー名は anonymous）
    /// 3. 保存してブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 配信したファイル通知
    /// * `Err(UploadError)` - ディスク書き込みの失敗、またはルーターの停止
    pub async fn execute(
        &self,
        username: String,
        original_name: &str,
        contents: &[u8],
    ) -> Result<ChatMessage, UploadError> {
        // 1. ディスクに保存
        let stored = self.storage.save(original_name, contents).await?;

        // 2. ファイル通知を作成
        let attachment = Attachment {
            url: stored.url,
            original_name: original_name.to_string(),
            size_bytes: stored.size_bytes,
        };
        let message = ChatMessage::file(username, attachment, upload_color(), Timestamp::now());

        // 3. 保存・配信
        self.send.execute(message.clone()).await?;

        tracing::info!(
            sender = %message.sender,
            file_name = original_name,
            size_bytes = stored.size_bytes,
            "file uploaded"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{HistoryLimit, MessageStore},
        infrastructure::{
            broadcast::{BroadcastRouter, ConnectionHandle, ConnectionRegistry},
            repository::InMemoryMessageStore,
        },
    };
    use std::{sync::Arc, time::Duration};

    #[tokio::test]
    async fn test_upload_file_announces_attachment() {
        // テスト項目: 3 バイトの note.txt をアップロードするとファイル通知が配信・保存される
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path());
        let store = Arc::new(InMemoryMessageStore::new());
        let registry = Arc::new(ConnectionRegistry::default());
        let (handle, mut rx) = ConnectionHandle::channel();
        registry.register(handle).await;
        let (router, publisher) = BroadcastRouter::new(registry, 0);
        let _task = router.spawn();
        let usecase =
            UploadFileUseCase::new(storage, SendMessageUseCase::new(store.clone(), publisher));

        // when (操作):
        let message = usecase
            .execute("carol".into(), "note.txt", b"abc")
            .await
            .unwrap();

        // then (期待する結果):
        assert!(message.is_file());
        assert!(message.body.is_empty());
        assert_eq!(message.color.as_str(), "#3366cc");
        let attachment = message.attachment.as_ref().unwrap();
        assert_eq!(attachment.original_name, "note.txt");
        assert_eq!(attachment.size_bytes, 3);
        assert!(attachment.url.starts_with("/uploads/"));
        assert!(attachment.url.ends_with(".txt"));

        let delivered = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*delivered, message);
        assert_eq!(store.recent(HistoryLimit::default()).await.unwrap(), vec![message]);
    }

    #[tokio::test]
    async fn test_upload_file_defaults_username() {
        // テスト項目: ユーザー名が空なら anonymous になる
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ConnectionRegistry::default());
        let (router, publisher) = BroadcastRouter::new(registry, 0);
        let _task = router.spawn();
        let usecase = UploadFileUseCase::new(
            UploadStorage::new(dir.path()),
            SendMessageUseCase::new(Arc::new(InMemoryMessageStore::new()), publisher),
        );

        let message = usecase.execute("".into(), "a.png", b"x").await.unwrap();

        assert_eq!(message.sender, "anonymous");
    }

    #[tokio::test]
    async fn test_upload_file_storage_error() {
        // テスト項目: 保存先が無い場合は Storage エラーになり、何も配信されない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryMessageStore::new());
        let registry = Arc::new(ConnectionRegistry::default());
        let (router, publisher) = BroadcastRouter::new(registry, 0);
        let _task = router.spawn();
        let usecase = UploadFileUseCase::new(
            UploadStorage::new(dir.path().join("missing")),
            SendMessageUseCase::new(store.clone(), publisher),
        );

        // when (操作):
        let result = usecase.execute("carol".into(), "note.txt", b"abc").await;

        // then (期待する結果):
        assert!(matches!(result, Err(UploadError::Storage(_))));
        assert_eq!(store.len().await, 0);
    }
}
