//! In-process fan-out: the connection registry and the broadcast router.

pub mod registry;
pub mod router;

pub use registry::{
    ConnectionHandle, ConnectionRegistry, OutboundReceiver, Undeliverable, Visit,
};
pub use router::{BroadcastPublisher, BroadcastRouter, FanOut, PublishError};
