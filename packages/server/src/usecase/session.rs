//! UseCase: 接続ごとのセッション処理
//!
//! 1 接続につき reader / writer の 2 タスクを起動し、どちらかが終わった時点で
//! 接続を Registry から外す。
//!
//! ```text
//! Connecting -> Registered -> (履歴の再送) -> Streaming -> Closed
//! ```
//!
//! 全ての待ち（受信・書き込み）にはタイムアウトがあり、
//! 応答しない相手に対してタスクが残り続けることはない。

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    domain::{
        ChatMessage, ConnectionId, HistoryLimit, Inbound, MessageSink, MessageSource,
        MessageStore, PresentationColor, SessionState, TransportError,
    },
    infrastructure::broadcast::{
        BroadcastPublisher, ConnectionHandle, ConnectionRegistry, OutboundReceiver,
    },
};

use super::{
    connect_participant::ConnectParticipantUseCase,
    disconnect_participant::DisconnectParticipantUseCase, send_message::SendMessageUseCase,
};

/// 接続ごとのタイムアウト設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// 1 回の書き込み（メッセージ・ping）の上限
    pub write_timeout: Duration,
    /// 次のフレームを待つ上限。ping への pong も受信として数える
    pub read_timeout: Duration,
    /// ping を送る間隔
    pub ping_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(300),
            ping_interval: Duration::from_secs(30),
        }
    }
}

/// セッション実行のユースケース
#[derive(Clone)]
pub struct RunSessionUseCase {
    connect: ConnectParticipantUseCase,
    send: SendMessageUseCase,
    disconnect: DisconnectParticipantUseCase,
    settings: SessionSettings,
}

impl RunSessionUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        registry: Arc<ConnectionRegistry>,
        publisher: BroadcastPublisher,
        max_history: HistoryLimit,
        settings: SessionSettings,
    ) -> Self {
        Self {
            connect: ConnectParticipantUseCase::new(store.clone(), registry.clone(), max_history),
            send: SendMessageUseCase::new(store, publisher),
            disconnect: DisconnectParticipantUseCase::new(registry),
            settings,
        }
    }

    /// セッションを最後まで実行
    ///
    /// 1. Registry に登録し、履歴を取得
    /// 2. 履歴を新しい接続に直接書き込む（失敗したら切断）
    /// 3. reader / writer を起動し、どちらかが終わるまで待つ
    /// 4. Registry から削除
    ///
    /// 戻り値は常に [`SessionState::Closed`]。
    pub async fn execute<S, R>(&self, mut sink: S, source: R) -> SessionState
    where
        S: MessageSink + 'static,
        R: MessageSource + 'static,
    {
        let mut state = SessionState::Connecting;

        // 1. 登録
        let (handle, outbound) = ConnectionHandle::channel();
        let participant = self.connect.execute(handle).await;
        let id = participant.id;
        state = advance(state, SessionState::Registered);

        // 2. 履歴の再送
        for message in &participant.history {
            if let Err(e) = bounded(self.settings.write_timeout, sink.send_json(message)).await {
                tracing::warn!(connection_id = %id, error = %e, "history replay failed");
                self.disconnect.execute(&id).await;
                sink.close().await;
                return advance(state, SessionState::Closed);
            }
        }
        state = advance(state, SessionState::Streaming);

        // 3. reader / writer
        let mut writer = tokio::spawn(write_loop(
            sink,
            outbound,
            participant.history,
            self.settings,
            id.clone(),
        ));
        let mut reader = tokio::spawn(read_loop(
            source,
            self.send.clone(),
            participant.color,
            self.settings.read_timeout,
            id.clone(),
        ));

        // 4. 片方が終わったら後始末
        tokio::select! {
            _ = &mut reader => {
                // 送信側を落とすと writer は残りを書き出して終了する
                self.disconnect.execute(&id).await;
                if tokio::time::timeout(self.settings.write_timeout, &mut writer)
                    .await
                    .is_err()
                {
                    writer.abort();
                }
            }
            _ = &mut writer => {
                reader.abort();
                self.disconnect.execute(&id).await;
            }
        }

        advance(state, SessionState::Closed)
    }
}

fn advance(state: SessionState, next: SessionState) -> SessionState {
    state.advance(next).unwrap_or_else(|e| {
        tracing::error!(error = %e, "unexpected session transition");
        next
    })
}

/// Run `operation`, failing with [`TransportError::TimedOut`] once `limit` elapses.
async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| TransportError::TimedOut(limit))?
}

/// Drain the outbound queue into the sink, pinging on every idle interval.
///
/// A message persisted before the history was loaded but fanned out after
/// registration is queued as well; `replayed` holds what the client already
/// got so it is not written twice.
async fn write_loop<S: MessageSink>(
    mut sink: S,
    mut outbound: OutboundReceiver,
    replayed: Vec<ChatMessage>,
    settings: SessionSettings,
    id: ConnectionId,
) {
    let mut heartbeat = tokio::time::interval_at(
        Instant::now() + settings.ping_interval,
        settings.ping_interval,
    );
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let result = tokio::select! {
            message = outbound.recv() => match message {
                Some(message) if replayed.contains(&*message) => {
                    tracing::debug!(connection_id = %id, "skipping message already sent in history");
                    continue;
                }
                Some(message) => bounded(settings.write_timeout, sink.send_json(&message)).await,
                // deregistered
                None => break,
            },
            _ = heartbeat.tick() => bounded(settings.write_timeout, sink.ping()).await,
        };
        if let Err(e) = result {
            tracing::warn!(connection_id = %id, error = %e, "write failed, closing connection");
            break;
        }
    }

    sink.close().await;
    tracing::debug!(connection_id = %id, "writer finished");
}

async fn read_loop<R: MessageSource>(
    mut source: R,
    send: SendMessageUseCase,
    color: PresentationColor,
    read_timeout: Duration,
    id: ConnectionId,
) {
    loop {
        let inbound = match bounded(read_timeout, source.receive()).await {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!(connection_id = %id, error = %e, "read failed, closing connection");
                break;
            }
        };

        match inbound {
            Inbound::Message(incoming) => {
                if let Err(e) = send.receive(incoming, &color).await {
                    tracing::error!(connection_id = %id, error = %e, "dropping message");
                    break;
                }
            }
            Inbound::Heartbeat => {}
            Inbound::Closed => {
                tracing::info!(connection_id = %id, "client closed connection");
                break;
            }
        }
    }
}
