use std::net::IpAddr;
use std::time::{Duration, Instant};

use axum::extract::ws::{WebSocket, close_code};
use futures::stream::{SplitStream, StreamExt};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::shared::app_state::AppState;

use super::connection::{Connection, HeartbeatEvent};
use super::protocol;

const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const PACKET_RATE_WINDOW: Duration = Duration::from_secs(1);
const RATE_LIMIT_BAN: Duration = Duration::from_secs(15);

/// Decrements the open-connection count for this IP when the connection
/// task ends, whatever the reason.
struct ConnectionCounterGuard {
    state: AppState,
    ip: IpAddr,
}

impl Drop for ConnectionCounterGuard {
    fn drop(&mut self) {
        self.state.ban_controller.release_connection(self.ip);
    }
}

pub struct ConnectionHandler {
    connection: Connection,
    message_receiver: SplitStream<WebSocket>,
    tick_receiver: broadcast::Receiver<Vec<u8>>,
    close_receiver: broadcast::Receiver<(IpAddr, u16)>,
    client_ip: IpAddr,
    packet_window_start: Instant,
    packets_in_window: u32,
    _guard: ConnectionCounterGuard,
}

impl ConnectionHandler {
    #[must_use]
    pub fn new(socket: WebSocket, state: &AppState, client_ip: IpAddr) -> Self {
        let (connection, message_receiver) = Connection::new(socket, client_ip);
        let tick_receiver = state.tick_broadcast.subscribe();
        let close_receiver = state.close_signal.subscribe();

        Self {
            connection,
            message_receiver,
            tick_receiver,
            close_receiver,
            client_ip,
            packet_window_start: Instant::now(),
            packets_in_window: 0,
            _guard: ConnectionCounterGuard {
                state: state.clone(),
                ip: client_ip,
            },
        }
    }

    pub async fn run(mut self, state: AppState) {
        info!(ip = %self.client_ip, "websocket connection opened");

        let mut last_activity = Instant::now();

        loop {
            tokio::select! {
                incoming = self.message_receiver.next() => {
                    if !self.handle_incoming(incoming, &state).await {
                        break;
                    }
                    last_activity = Instant::now();
                }

                tick = self.tick_receiver.recv() => {
                    if !self.handle_tick(tick).await {
                        break;
                    }
                }

                closed = self.close_receiver.recv() => {
                    if !self.handle_close_signal(closed).await {
                        break;
                    }
                }

                event = self.connection.heartbeat_wait() => {
                    match event {
                        HeartbeatEvent::PingDue => self.connection.arm_ping(),
                        HeartbeatEvent::PongTimeout => {
                            self.connection.close(close_code::AWAY, "ping timeout").await;
                            break;
                        }
                    }
                }

                () = tokio::time::sleep(IDLE_TIMEOUT.saturating_sub(last_activity.elapsed())) => {
                    if last_activity.elapsed() >= IDLE_TIMEOUT {
                        debug!(ip = %self.client_ip, "websocket idle timeout");
                        self.connection.close(close_code::AWAY, "idle timeout").await;
                        break;
                    }
                }
            }
        }

        info!(ip = %self.client_ip, "websocket connection closed");
    }

    async fn handle_incoming(
        &mut self,
        incoming: Option<Result<axum::extract::ws::Message, axum::Error>>,
        state: &AppState,
    ) -> bool {
        use axum::extract::ws::Message;

        match incoming {
            Some(Ok(Message::Binary(bytes))) => {
                let (packets, error) = protocol::decode_frame(&bytes);

                for packet in packets {
                    if !self.admit_packet(state).await {
                        return false;
                    }
                    if let Some(code) = self
                        .connection
                        .handle_decoded_packet(packet, state.paint_use_case.as_ref())
                        .await
                    {
                        self.connection.close(code, "protocol violation").await;
                        return false;
                    }
                }

                if let Some(error) = error {
                    let code = self.connection.decode_error_close_code(error);
                    self.connection.close(code, "protocol violation").await;
                    return false;
                }

                true
            }
            Some(Ok(Message::Close(_))) => {
                debug!(ip = %self.client_ip, "client closed the websocket");
                false
            }
            Some(Ok(_)) => {
                // Text/Ping/Pong frames at the transport level; the protocol
                // is binary-only, so anything else is ignored rather than
                // treated as a violation (axum already answers transport pings).
                true
            }
            Some(Err(err)) => {
                warn!(ip = %self.client_ip, error = %err, "websocket transport error");
                false
            }
            None => {
                debug!(ip = %self.client_ip, "websocket stream ended");
                false
            }
        }
    }

    async fn handle_tick(&mut self, tick: Result<Vec<u8>, broadcast::error::RecvError>) -> bool {
        match tick {
            Ok(frame) => {
                self.connection.queue_bytes(&frame);
                if let Err(err) = self.connection.flush().await {
                    debug!(ip = %self.client_ip, error = %err, "failed to flush send buffer");
                    return false;
                }
                true
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(ip = %self.client_ip, skipped, "connection lagged behind the tick broadcast");
                true
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!(ip = %self.client_ip, "tick broadcast closed");
                false
            }
        }
    }

    /// Closes this connection if a ban was just published for its IP.
    /// Every sibling connection from the banned IP subscribes to the same
    /// `close_signal` broadcast, so one ban closes all of them.
    async fn handle_close_signal(
        &mut self,
        signal: Result<(IpAddr, u16), broadcast::error::RecvError>,
    ) -> bool {
        match signal {
            Ok((ip, code)) if ip == self.client_ip => {
                self.connection.close(code, "ip banned").await;
                false
            }
            Ok(_) => true,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(ip = %self.client_ip, skipped, "connection lagged behind the close-signal broadcast");
                true
            }
            Err(broadcast::error::RecvError::Closed) => true,
        }
    }

    /// Enforces the fixed 1-second per-connection packet window. Exceeding
    /// it bans the IP for a short fixed duration and closes every connection
    /// from that IP with 1013 — this one directly, siblings via
    /// `close_signal`.
    async fn admit_packet(&mut self, state: &AppState) -> bool {
        let now = Instant::now();
        if now.duration_since(self.packet_window_start) >= PACKET_RATE_WINDOW {
            self.packet_window_start = now;
            self.packets_in_window = 0;
        }
        self.packets_in_window += 1;

        if self.packets_in_window > state.ban_controller.max_packet_per_second() {
            warn!(ip = %self.client_ip, "packet rate limit exceeded");
            state
                .ban_controller
                .ban_ip(self.client_ip, RATE_LIMIT_BAN, OffsetDateTime::now_utc());
            let _ = state.close_signal.send((self.client_ip, close_code::AGAIN));
            self.connection
                .close(close_code::AGAIN, "rate limit exceeded")
                .await;
            return false;
        }

        true
    }
}
