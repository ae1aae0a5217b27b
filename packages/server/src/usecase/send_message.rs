//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() / receive() メソッド
//! - 永続化してからブロードキャストへ渡す流れ
//!
//! ### なぜこのテストが必要か
//! - 永続化に失敗してもメッセージは配信される（配信を優先する）ことを保証
//! - クライアントが送った色・時刻ではなく、接続の色とサーバー時刻が使われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存して配信
//! - 異常系：保存失敗（配信は続行）、ルーター停止（エラー）

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, IncomingMessage, MessageStore, PresentationColor, Timestamp},
    infrastructure::broadcast::BroadcastPublisher,
};

use super::error::SendMessageError;

/// 送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    /// ストアへの保存に成功したか
    pub persisted: bool,
}

/// メッセージ送信のユースケース
///
/// WebSocket の受信ループとファイルアップロードの両方から使われる。
#[derive(Clone)]
pub struct SendMessageUseCase {
    store: Arc<dyn MessageStore>,
    publisher: BroadcastPublisher,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>, publisher: BroadcastPublisher) -> Self {
        Self { store, publisher }
    }

    /// クライアントから受信したメッセージを送信
    ///
    /// 接続に割り当てられた色と現在時刻を付与してから [`execute`](Self::execute) する。
    pub async fn receive(
        &self,
        incoming: IncomingMessage,
        color: &PresentationColor,
    ) -> Result<SendOutcome, SendMessageError> {
        let message = incoming.stamp(color, Timestamp::now());
        self.execute(message).await
    }

    /// メッセージ送信を実行
    ///
    /// 1. Store に保存（失敗はログのみ）
    /// 2. Broadcast Router に渡す
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - ブロードキャストに渡した
    /// * `Err(SendMessageError)` - ルーターが停止している
    pub async fn execute(&self, message: ChatMessage) -> Result<SendOutcome, SendMessageError> {
        // 1. 保存
        let persisted = match self.store.append(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, sender = %message.sender, "failed to persist message");
                false
            }
        };

        // 2. ブロードキャスト
        self.publisher.publish(message)?;

        Ok(SendOutcome { persisted })
    }
}
