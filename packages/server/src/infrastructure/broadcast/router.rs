//! Broadcast Router: single-consumer fan-out of chat messages.
//!
//! Producers publish into an unbounded intake queue. One task dequeues in
//! FIFO order and pushes every message into each registered connection's
//! outbound queue. A connection whose queue is closed is pruned.
//!
//! The intake is unbounded: nothing is dropped, and queue depth is tracked so
//! a backlog shows up in the logs.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

use super::registry::{ConnectionRegistry, Visit};
use crate::domain::ChatMessage;

/// The router task is gone; nothing can be broadcast any more
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("broadcast router has stopped")]
pub struct PublishError;

/// Producer side of the intake queue. Cheap to clone.
#[derive(Clone)]
pub struct BroadcastPublisher {
    intake: mpsc::UnboundedSender<ChatMessage>,
    depth: Arc<AtomicUsize>,
    warn_depth: usize,
}

impl BroadcastPublisher {
    /// Enqueue a message for fan-out. Never waits.
    pub fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        let depth = self.depth.fetch_add(1, Ordering::Relaxed) + 1;
        if self.intake.send(message).is_err() {
            self.depth.fetch_sub(1, Ordering::Relaxed);
            return Err(PublishError);
        }
        if self.warn_depth > 0 && depth % self.warn_depth == 0 {
            tracing::warn!(depth, "broadcast intake queue is backing up");
        }
        Ok(())
    }

    /// Messages published but not yet dequeued by the router
    pub fn queue_depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

/// Result of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub pruned: usize,
}

/// Consumer side: owns the intake queue and fans out into the registry.
pub struct BroadcastRouter {
    registry: Arc<ConnectionRegistry>,
    intake: mpsc::UnboundedReceiver<ChatMessage>,
    depth: Arc<AtomicUsize>,
}

impl BroadcastRouter {
    /// Create the router and its publisher.
    ///
    /// `warn_depth` is the backlog size at which a warning is logged (and
    /// every multiple of it); `0` disables the warning.
    pub fn new(registry: Arc<ConnectionRegistry>, warn_depth: usize) -> (Self, BroadcastPublisher) {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        let router = Self {
            registry,
            intake: rx,
            depth: depth.clone(),
        };
        let publisher = BroadcastPublisher {
            intake: tx,
            depth,
            warn_depth,
        };
        (router, publisher)
    }

    /// Consume the intake until every publisher is dropped.
    pub async fn run(mut self) {
        tracing::info!("broadcast router started");
        while let Some(message) = self.intake.recv().await {
            self.depth.fetch_sub(1, Ordering::Relaxed);
            self.fan_out(message).await;
        }
        tracing::info!("broadcast router stopped: all publishers dropped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Deliver one message to every registered connection, pruning the dead ones.
    pub async fn fan_out(&self, message: ChatMessage) -> FanOut {
        let message = Arc::new(message);
        let mut delivered = 0;
        let pruned = self
            .registry
            .for_each(|id, handle| match handle.deliver(Arc::clone(&message)) {
                Ok(()) => {
                    delivered += 1;
                    Visit::Keep
                }
                Err(_) => {
                    tracing::info!(connection_id = %id, "pruning connection that stopped receiving");
                    Visit::Remove
                }
            })
            .await;
        tracing::debug!(delivered, pruned, sender = %message.sender, "broadcast message");
        FanOut { delivered, pruned }
    }
}
