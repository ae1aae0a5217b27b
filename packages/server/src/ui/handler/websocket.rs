//! WebSocket connection handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::{
    domain::{ChatMessage, Inbound, MessageSink, MessageSource, TransportError},
    infrastructure::dto::{ChatMessageDto, InboundMessageDto},
    ui::state::AppState,
    usecase::RunSessionUseCase,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session = state.run_session_usecase();
    ws.on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| handle_socket(socket, session))
}

async fn handle_socket(socket: WebSocket, session: RunSessionUseCase) {
    let (sender, receiver) = socket.split();
    let state = session
        .execute(WsSink { sender }, WsSource { receiver })
        .await;
    tracing::debug!(?state, "websocket session ended");
}

/// Write half of an upgraded socket
struct WsSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl MessageSink for WsSink {
    async fn send_json(&mut self, message: &ChatMessage) -> Result<(), TransportError> {
        let json = serde_json::to_string(&ChatMessageDto::from(message))
            .map_err(|e| TransportError::Write(e.to_string()))?;
        self.sender
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        self.sender
            .send(Message::Ping(Bytes::new()))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.sender.close().await {
            tracing::debug!(error = %e, "close on a dead socket");
        }
    }
}

/// Read half of an upgraded socket
struct WsSource {
    receiver: SplitStream<WebSocket>,
}

#[async_trait]
impl MessageSource for WsSource {
    async fn receive(&mut self) -> Result<Inbound, TransportError> {
        let frame = match self.receiver.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => return Err(TransportError::Read(e.to_string())),
            None => return Ok(Inbound::Closed),
        };

        match frame {
            Message::Text(text) => decode(text.as_str().as_bytes()),
            Message::Binary(bytes) => decode(&bytes),
            // pings are answered by the protocol layer
            Message::Ping(_) | Message::Pong(_) => Ok(Inbound::Heartbeat),
            Message::Close(_) => Ok(Inbound::Closed),
        }
    }
}

fn decode(payload: &[u8]) -> Result<Inbound, TransportError> {
    let dto: InboundMessageDto = serde_json::from_slice(payload)?;
    Ok(Inbound::Message(dto.into()))
}
