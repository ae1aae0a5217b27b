//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断は受信エラー・書き込みエラー・ブロードキャスト時の削除のどれからでも起こる
//! - 既に削除済みの接続を再度切断してもエラーにならないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断
//! - エッジケース：既に削除済みの参加者の切断（何もしない）

use std::sync::Arc;

use crate::{domain::ConnectionId, infrastructure::broadcast::ConnectionRegistry};

/// 参加者切断のユースケース
#[derive(Clone)]
pub struct DisconnectParticipantUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `true` - この呼び出しで Registry から削除した
    /// * `false` - 既に削除済み（ブロードキャスト時の削除など）
    pub async fn execute(&self, id: &ConnectionId) -> bool {
        let removed = self.registry.deregister(id).await;
        let remaining = self.registry.len().await;
        tracing::info!(
            connection_id = %id,
            removed,
            remaining,
            "participant disconnected"
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::broadcast::ConnectionHandle;

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 参加者を切断すると Registry から削除される
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::default());
        let usecase = DisconnectParticipantUseCase::new(registry.clone());
        let (h1, _rx1) = ConnectionHandle::channel();
        let (h2, _rx2) = ConnectionHandle::channel();
        let (alice, _) = registry.register(h1).await;
        let (bob, _) = registry.register(h2).await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(registry.len().await, 1);
        assert!(registry.contains(&bob).await);
    }

    #[tokio::test]
    async fn test_disconnect_last_participant() {
        // テスト項目: 最後の参加者が切断すると Registry は空になる
        let registry = Arc::new(ConnectionRegistry::default());
        let usecase = DisconnectParticipantUseCase::new(registry.clone());
        let (handle, _rx) = ConnectionHandle::channel();
        let (alice, _) = registry.register(handle).await;

        usecase.execute(&alice).await;

        assert_eq!(registry.len().await, 0);
    }

    #[test]
    fn test_disconnect_future_is_send() {
        // テスト項目: 切断処理の Future は Send（セッションのタスクから呼べる）
        fn assert_send<T: Send>(_: &T) {}
        let usecase = DisconnectParticipantUseCase::new(Arc::new(ConnectionRegistry::default()));
        let id = crate::domain::ConnectionIdFactory::generate();

        assert_send(&usecase.execute(&id));
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 既に削除済みの参加者を切断しても何も起きない
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::default());
        let usecase = DisconnectParticipantUseCase::new(registry.clone());
        let (handle, _rx) = ConnectionHandle::channel();
        let (alice, _) = registry.register(handle).await;
        usecase.execute(&alice).await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.len().await, 0);
    }
}
