//! Connection Registry: who is connected. Colors are handed out on registration.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc};

use crate::domain::{ChatMessage, ColorPalette, ConnectionId, ConnectionIdFactory, PresentationColor};

/// Receiving end of a connection's outbound queue, drained by its writer task
pub type OutboundReceiver = mpsc::UnboundedReceiver<Arc<ChatMessage>>;

/// Delivery to a connection failed because its writer has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undeliverable;

/// Outbound handle of one live connection.
///
/// The registry holds the only sender. Dropping the entry therefore closes the
/// queue, and the connection's writer closes the socket once it is drained.
#[derive(Debug)]
pub struct ConnectionHandle {
    sender: mpsc::UnboundedSender<Arc<ChatMessage>>,
}

impl ConnectionHandle {
    /// Create a handle and the queue its writer drains
    pub fn channel() -> (Self, OutboundReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a message without waiting for the socket.
    pub fn deliver(&self, message: Arc<ChatMessage>) -> Result<(), Undeliverable> {
        self.sender.send(message).map_err(|_| Undeliverable)
    }
}

/// What the `for_each` visitor wants done with the entry it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Remove,
}

/// Live connections keyed by id.
///
/// Insert, remove and iterate take the same lock.
pub struct ConnectionRegistry {
    palette: ColorPalette,
    entries: Mutex<HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            palette,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a connection and assign its color.
    ///
    /// The color is `palette[current size % palette length]`, so concurrent
    /// connections may share a color.
    pub async fn register(&self, handle: ConnectionHandle) -> (ConnectionId, PresentationColor) {
        let mut entries = self.entries.lock().await;
        let color = self.palette.pick(entries.len());
        let id = ConnectionIdFactory::generate();
        entries.insert(id.clone(), handle);
        tracing::debug!(connection_id = %id, %color, live = entries.len(), "registered connection");
        (id, color)
    }

    /// Remove a connection. Returns whether it was still registered.
    pub async fn deregister(&self, id: &ConnectionId) -> bool {
        let removed = self.entries.lock().await.remove(id).is_some();
        if removed {
            tracing::debug!(connection_id = %id, "deregistered connection");
        }
        removed
    }

    /// Visit every registered entry once, removing those the visitor rejects.
    ///
    /// The visitor runs under the registry lock and must not block.
    /// Returns the number of removed entries.
    pub async fn for_each<F>(&self, mut visitor: F) -> usize
    where
        F: FnMut(&ConnectionId, &ConnectionHandle) -> Visit,
    {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|id, handle| visitor(id, handle) == Visit::Keep);
        before - entries.len()
    }

    pub async fn contains(&self, id: &ConnectionId) -> bool {
        self.entries.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Size without waiting; `None` while the lock is held
    #[cfg(test)]
    pub(crate) fn try_len(&self) -> Option<usize> {
        self.entries.try_lock().ok().map(|entries| entries.len())
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(ColorPalette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::palette::DEFAULT_COLORS;
    use std::collections::HashSet;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 登録順に応じた色の割り当て（パレットの循環）
    // - deregister の冪等性
    // - for_each が登録済みの集合をちょうど 1 回ずつ訪問し、訪問中の削除に耐えること
    // ========================================

    #[tokio::test]
    async fn test_register_assigns_palette_in_order() {
        // テスト項目: k 番目の登録には palette[k % 10] が割り当てられる
        // given (前提条件):
        let registry = ConnectionRegistry::default();
        let mut receivers = Vec::new();

        // when (操作): 11 接続を順に登録
        let mut colors = Vec::new();
        for _ in 0..11 {
            let (handle, rx) = ConnectionHandle::channel();
            receivers.push(rx);
            let (_, color) = registry.register(handle).await;
            colors.push(color);
        }

        // then (期待する結果):
        for (k, color) in colors.iter().enumerate() {
            assert_eq!(color.as_str(), DEFAULT_COLORS[k % DEFAULT_COLORS.len()]);
        }
        assert_eq!(colors[10], colors[0]);
        assert_eq!(registry.len().await, 11);
    }

    #[tokio::test]
    async fn test_color_depends_on_current_size() {
        // テスト項目: 色は登録時点の接続数で決まる（切断後は色が再利用される）
        // given (前提条件):
        let registry = ConnectionRegistry::default();
        let (h1, _rx1) = ConnectionHandle::channel();
        let (h2, _rx2) = ConnectionHandle::channel();
        let (id1, c1) = registry.register(h1).await;
        let (_id2, c2) = registry.register(h2).await;

        // when (操作): 1 人目が抜けてから新しい接続
        registry.deregister(&id1).await;
        let (h3, _rx3) = ConnectionHandle::channel();
        let (_id3, c3) = registry.register(h3).await;

        // then (期待する結果): 2 人目と同じ色になる
        assert_ne!(c1, c2);
        assert_eq!(c3, c2);
    }

    #[tokio::test]
    async fn test_deregister_is_idempotent() {
        // テスト項目: 既に削除された接続の deregister は何もしない
        let registry = ConnectionRegistry::default();
        let (handle, _rx) = ConnectionHandle::channel();
        let (id, _) = registry.register(handle).await;

        assert!(registry.deregister(&id).await);
        assert!(!registry.deregister(&id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_for_each_visits_every_entry_once() {
        // テスト項目: for_each は登録済みの接続をちょうど 1 回ずつ訪問する
        // given (前提条件):
        let registry = ConnectionRegistry::default();
        let mut expected = HashSet::new();
        let mut receivers = Vec::new();
        for _ in 0..5 {
            let (handle, rx) = ConnectionHandle::channel();
            receivers.push(rx);
            let (id, _) = registry.register(handle).await;
            expected.insert(id);
        }

        // when (操作):
        let mut visited = Vec::new();
        let removed = registry
            .for_each(|id, _| {
                visited.push(id.clone());
                Visit::Keep
            })
            .await;

        // then (期待する結果):
        assert_eq!(removed, 0);
        assert_eq!(visited.len(), 5);
        assert_eq!(visited.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[tokio::test]
    async fn test_for_each_allows_removing_current_entry() {
        // テスト項目: 訪問中の接続を削除でき、削除後は登録から消えている
        // given (前提条件):
        let registry = ConnectionRegistry::default();
        let (h1, _rx1) = ConnectionHandle::channel();
        let (h2, _rx2) = ConnectionHandle::channel();
        let (h3, _rx3) = ConnectionHandle::channel();
        let (id1, _) = registry.register(h1).await;
        let (id2, _) = registry.register(h2).await;
        let (id3, _) = registry.register(h3).await;

        // when (操作): id2 を訪問中に削除
        let mut visits = HashMap::new();
        let removed = registry
            .for_each(|id, _| {
                *visits.entry(id.clone()).or_insert(0) += 1;
                if id == &id2 { Visit::Remove } else { Visit::Keep }
            })
            .await;

        // then (期待する結果):
        assert_eq!(removed, 1);
        assert_eq!(visits.get(&id2), Some(&1));
        assert!(visits.values().all(|n| *n == 1));
        assert!(!registry.contains(&id2).await);
        assert!(registry.contains(&id1).await);
        assert!(registry.contains(&id3).await);
    }

    #[tokio::test]
    async fn test_deliver_fails_after_receiver_dropped() {
        // テスト項目: writer 側が終了した接続への配信は失敗する
        let (handle, rx) = ConnectionHandle::channel();
        drop(rx);

        let message = ChatMessage::text(
            "a".into(),
            "b".into(),
            PresentationColor::new("#3366cc").unwrap(),
            crate::domain::Timestamp::now(),
        );

        assert_eq!(handle.deliver(Arc::new(message)), Err(Undeliverable));
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        // テスト項目: 並行に登録しても全接続が記録される
        let registry = Arc::new(ConnectionRegistry::default());
        let mut tasks = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (handle, rx) = ConnectionHandle::channel();
                let (id, _) = registry.register(handle).await;
                (id, rx)
            }));
        }

        let mut ids = HashSet::new();
        let mut receivers = Vec::new();
        for task in tasks {
            let (id, rx) = task.await.unwrap();
            ids.insert(id);
            receivers.push(rx);
        }

        assert_eq!(ids.len(), 32);
        assert_eq!(registry.len().await, 32);
    }
}
