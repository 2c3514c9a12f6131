use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

use application::board::service::encode_broadcast_frame;
use application::config::TickSettings;
use application::ports::outgoing::tick_broadcast::TickBroadcastPort;
use paintboard_adapters::outgoing::events_broadcast::tokio_broadcast::TokioBroadcastAdapter;
use paintboard_adapters::shared::app_state::AppState;

const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);
const OVERLOAD_MARGIN: Duration = Duration::from_millis(50);

/// Drives §4.6's tick loop: drain the dirty set, encode one frame, publish
/// it to every connection. Ticks that miss their deadline by more than
/// `OVERLOAD_MARGIN` log a warning rather than trying to catch up.
pub fn spawn_tick_scheduler(state: AppState) {
    let tick_settings = TickSettings::from(state.config.as_ref());
    let tick_interval = tick_settings.tick_interval();
    let broadcast = TokioBroadcastAdapter::new(state.tick_broadcast.clone());

    tokio::spawn(async move {
        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let mut previous_tick = Instant::now();
        loop {
            ticker.tick().await;

            let elapsed = previous_tick.elapsed();
            previous_tick = Instant::now();
            if elapsed > tick_interval + OVERLOAD_MARGIN {
                warn!(elapsed_ms = elapsed.as_millis() as u64, "tick scheduler overran its deadline");
            }

            let dirty = state.tick_use_case.drain_tick().await;
            let frame = encode_broadcast_frame(&dirty);
            if let Err(err) = broadcast.publish_tick(frame) {
                warn!(error = %err, "failed to publish tick broadcast");
            }
        }
    });
}

/// Drives §4.7's auto-save timer.
pub fn spawn_auto_save(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = interval(AUTO_SAVE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = state.persistence_use_case.save_now().await {
                warn!(error = %err, "auto-save failed");
            }
        }
    });
}
