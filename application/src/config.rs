use std::time::Duration;

use crate::infrastructure_config::Config;

/// Runtime settings derived from [`Config`], in the shapes the paint pipeline
/// actually consumes (durations rather than raw millisecond integers, etc).
#[derive(Debug, Clone, Copy)]
pub struct PaintSettings {
    pub board_width: u16,
    pub board_height: u16,
    pub paint_delay: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct TickSettings {
    pub ticks_per_second: u32,
}

impl TickSettings {
    #[must_use]
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ticks_per_second.max(1)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub max_packet_per_second: u32,
    pub max_web_socket_per_ip: u32,
    pub ban_duration: Duration,
}

impl From<&Config> for PaintSettings {
    fn from(config: &Config) -> Self {
        Self {
            board_width: config.width,
            board_height: config.height,
            paint_delay: Duration::from_millis(config.paint_delay),
        }
    }
}

impl From<&Config> for TickSettings {
    fn from(config: &Config) -> Self {
        Self {
            ticks_per_second: config.ticks_per_second,
        }
    }
}

impl From<&Config> for RateLimitSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_packet_per_second: config.max_packet_per_second,
            max_web_socket_per_ip: config.max_web_socket_per_ip,
            ban_duration: Duration::from_millis(config.ban_duration),
        }
    }
}
