//! UseCase: 履歴取得（`GET /history`）

use std::sync::Arc;

use crate::domain::{ChatMessage, HistoryLimit, MessageStore, StoreError};

/// 履歴取得のユースケース
#[derive(Clone)]
pub struct FetchHistoryUseCase {
    store: Arc<dyn MessageStore>,
    default_limit: HistoryLimit,
}

impl FetchHistoryUseCase {
    pub fn new(store: Arc<dyn MessageStore>, default_limit: HistoryLimit) -> Self {
        Self {
            store,
            default_limit,
        }
    }

    /// 最新の履歴を古い順で取得
    ///
    /// `raw_limit` が正の整数でなければ（未指定・0 以下・数値以外）デフォルト件数を使う。
    pub async fn execute(&self, raw_limit: Option<&str>) -> Result<Vec<ChatMessage>, StoreError> {
        let limit = HistoryLimit::parse_or(raw_limit, self.default_limit);
        self.store.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessageStore, PresentationColor, Timestamp},
        infrastructure::repository::InMemoryMessageStore,
    };

    async fn store_with(count: usize) -> Arc<InMemoryMessageStore> {
        let store = Arc::new(InMemoryMessageStore::new());
        for i in 0..count {
            let message = ChatMessage::text(
                "alice".into(),
                i.to_string(),
                PresentationColor::new("#3366cc").unwrap(),
                Timestamp::now(),
            );
            store.append(&message).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_fetch_history_with_valid_limit() {
        // テスト項目: 正の limit が指定されればその件数だけ返る
        let usecase = FetchHistoryUseCase::new(store_with(10).await, HistoryLimit::new(5).unwrap());

        let history = usecase.execute(Some("3")).await.unwrap();

        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["7", "8", "9"]);
    }

    #[tokio::test]
    async fn test_fetch_history_invalid_limit_equals_default() {
        // テスト項目: 0 以下・数値以外の limit はデフォルト件数と同じ結果になる
        // given (前提条件):
        let usecase = FetchHistoryUseCase::new(store_with(10).await, HistoryLimit::new(4).unwrap());
        let expected = usecase.execute(None).await.unwrap();

        // when (操作) / then (期待する結果):
        for raw in ["0", "-1", "abc", ""] {
            let history = usecase.execute(Some(raw)).await.unwrap();
            assert_eq!(history, expected, "limit={raw:?}");
        }
        assert_eq!(expected.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_history_passes_default_to_store() {
        // テスト項目: 不正な limit の場合、ストアにはデフォルト件数が渡される
        let mut store = MockMessageStore::new();
        store
            .expect_recent()
            .withf(|limit| limit.value() == 25)
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let usecase = FetchHistoryUseCase::new(Arc::new(store), HistoryLimit::new(25).unwrap());

        let history = usecase.execute(Some("-10")).await.unwrap();

        assert!(history.is_empty());
    }
}
