use std::net::IpAddr;
use std::time::Duration;

use dashmap::{DashMap, DashSet};
use time::OffsetDateTime;

use crate::config::RateLimitSettings;

/// Outcome of admitting a new WebSocket connection from an IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAdmission {
    Admitted,
    /// The IP just crossed `maxWebSocketPerIP`; every existing connection
    /// from it must be closed with 1008 and the IP banned for `banDuration`.
    LimitExceeded,
}

/// Owns the BanTable, UidBanSet, and per-IP open-connection counts. This is
/// the shared state the Rate & Ban Controller reads and writes; the
/// per-connection packet-rate window lives on the connection task itself
/// since it belongs to exactly one socket.
pub struct BanController {
    uid_bans: DashSet<u32>,
    ip_bans: DashMap<IpAddr, OffsetDateTime>,
    connections_per_ip: DashMap<IpAddr, u32>,
    settings: RateLimitSettings,
}

impl BanController {
    #[must_use]
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            uid_bans: DashSet::new(),
            ip_bans: DashMap::new(),
            connections_per_ip: DashMap::new(),
            settings,
        }
    }

    #[must_use]
    pub fn is_uid_banned(&self, uid: u32) -> bool {
        self.uid_bans.contains(&uid)
    }

    pub fn ban_uid(&self, uid: u32) {
        self.uid_bans.insert(uid);
    }

    pub fn unban_uid(&self, uid: u32) {
        self.uid_bans.remove(&uid);
    }

    /// `Some(remaining)` if the IP is currently banned; lazily clears the
    /// entry if the ban has expired.
    pub fn ip_ban_remaining(&self, ip: IpAddr, now: OffsetDateTime) -> Option<Duration> {
        let expiry = *self.ip_bans.get(&ip)?;
        if expiry <= now {
            self.ip_bans.remove(&ip);
            return None;
        }
        Some(Duration::from_secs_f64((expiry - now).as_seconds_f64().max(0.0)))
    }

    pub fn ban_ip(&self, ip: IpAddr, duration: Duration, now: OffsetDateTime) {
        let duration = time::Duration::seconds_f64(duration.as_secs_f64());
        self.ip_bans.insert(ip, now + duration);
    }

    /// Convenience wrapper around [`Self::ban_ip`] using the configured
    /// `banDuration`.
    pub fn ban_ip_for_configured_duration(&self, ip: IpAddr, now: OffsetDateTime) {
        self.ban_ip(ip, self.settings.ban_duration, now);
    }

    /// Registers a new connection from `ip`. If this pushes the IP's open
    /// connection count to or past `maxWebSocketPerIP` (when that limit is
    /// nonzero), the IP is banned and every connection from it — including
    /// the one just registered — must be closed by the caller.
    pub fn register_connection(&self, ip: IpAddr, now: OffsetDateTime) -> ConnectionAdmission {
        let mut count = self.connections_per_ip.entry(ip).or_insert(0);
        *count += 1;

        if self.settings.max_web_socket_per_ip > 0 && *count >= self.settings.max_web_socket_per_ip
        {
            drop(count);
            self.ban_ip_for_configured_duration(ip, now);
            return ConnectionAdmission::LimitExceeded;
        }

        ConnectionAdmission::Admitted
    }

    pub fn release_connection(&self, ip: IpAddr) {
        if let Some(mut count) = self.connections_per_ip.get_mut(&ip) {
            *count = count.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn max_packet_per_second(&self) -> u32 {
        self.settings.max_packet_per_second
    }
}
