//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続の登録（色の割り当て）と、再送する履歴の取得
//!
//! ### なぜこのテストが必要か
//! - 登録は履歴取得より先に行う必要がある（取得中のブロードキャストを取りこぼさない）
//! - 履歴取得の失敗で接続を拒否しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空の履歴 / 既存の履歴
//! - 異常系：ストアの取得エラー（空の履歴で続行）

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, ConnectionId, HistoryLimit, MessageStore, PresentationColor},
    infrastructure::broadcast::{ConnectionHandle, ConnectionRegistry},
};

/// 登録直後の接続
#[derive(Debug)]
pub struct ConnectedParticipant {
    pub id: ConnectionId,
    pub color: PresentationColor,
    /// 再送する履歴（古い順）
    pub history: Vec<ChatMessage>,
}

/// 参加者接続のユースケース
#[derive(Clone)]
pub struct ConnectParticipantUseCase {
    store: Arc<dyn MessageStore>,
    registry: Arc<ConnectionRegistry>,
    max_history: HistoryLimit,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        store: Arc<dyn MessageStore>,
        registry: Arc<ConnectionRegistry>,
        max_history: HistoryLimit,
    ) -> Self {
        Self {
            store,
            registry,
            max_history,
        }
    }

    /// 参加者接続を実行
    ///
    /// 1. Registry に登録して色を割り当てる
    /// 2. 最新 `max_history` 件の履歴を古い順で取得する
    ///
    /// 履歴の取得に失敗しても接続は続行し、空の履歴を返す。
    pub async fn execute(&self, handle: ConnectionHandle) -> ConnectedParticipant {
        // 1. 登録（履歴取得より先）
        let (id, color) = self.registry.register(handle).await;

        // 2. 履歴取得
        let history = match self.store.recent(self.max_history).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!(connection_id = %id, error = %e, "failed to load history for replay");
                Vec::new()
            }
        };

        tracing::info!(
            connection_id = %id,
            %color,
            history = history.len(),
            "participant connected"
        );
        ConnectedParticipant { id, color, history }
    }
}
