use std::sync::Arc;

use crate::error::AppResult;

/// Publishes one tick's worth of already-encoded broadcast bytes (the
/// concatenated `0xFA` records for this tick's dirty pixels, or an empty
/// buffer on an idle tick) to every subscribed connection.
pub trait TickBroadcastPort: Send + Sync {
    fn publish_tick(&self, frame: Vec<u8>) -> AppResult<()>;
}

pub type DynTickBroadcastPort = Arc<dyn TickBroadcastPort>;
