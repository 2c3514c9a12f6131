use tokio::sync::broadcast::Sender;
use tracing::debug;

use application::error::AppResult;
use application::ports::outgoing::tick_broadcast::TickBroadcastPort;

/// Publishes each tick's encoded frame to every subscribed connection. A
/// send with no subscribers is not an error — every connection may have
/// dropped between ticks without the scheduler finding out until its next
/// write.
pub struct TokioBroadcastAdapter {
    tx: Sender<Vec<u8>>,
}

impl TokioBroadcastAdapter {
    #[must_use]
    pub fn new(tx: Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

impl TickBroadcastPort for TokioBroadcastAdapter {
    fn publish_tick(&self, frame: Vec<u8>) -> AppResult<()> {
        if self.tx.receiver_count() == 0 {
            return Ok(());
        }
        if let Err(err) = self.tx.send(frame) {
            debug!(error = %err, "tick broadcast had no receivers");
        }
        Ok(())
    }
}
