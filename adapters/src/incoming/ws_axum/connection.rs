use std::net::IpAddr;
use std::time::{Duration, Instant};

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures::sink::SinkExt;
use futures::stream::{SplitSink, SplitStream, StreamExt};
use rand::Rng;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

use application::ports::incoming::paint::PaintUseCase;

use super::protocol::{self, DecodeError, DecodedPacket};

const PONG_DEADLINE: Duration = Duration::from_secs(3);
const MIN_PING_DELAY_SECS: u64 = 1;
const MAX_PING_DELAY_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] axum::Error),
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// What the connection's heartbeat sub-machine is waiting on right now.
pub enum HeartbeatEvent {
    PingDue,
    PongTimeout,
}

pub struct Connection {
    socket_sender: SplitSink<WebSocket, Message>,
    send_buffer: Vec<u8>,
    client_ip: IpAddr,
    waiting_pong: bool,
    next_ping_at: Instant,
    pong_deadline: Option<Instant>,
}

impl Connection {
    #[must_use]
    pub fn new(socket: WebSocket, client_ip: IpAddr) -> (Self, SplitStream<WebSocket>) {
        let (sender, receiver) = socket.split();
        let connection = Self {
            socket_sender: sender,
            send_buffer: Vec::new(),
            client_ip,
            waiting_pong: false,
            next_ping_at: Instant::now() + random_ping_delay(),
            pong_deadline: None,
        };
        (connection, receiver)
    }

    #[must_use]
    pub fn client_ip(&self) -> IpAddr {
        self.client_ip
    }

    pub fn queue_bytes(&mut self, bytes: &[u8]) {
        self.send_buffer.extend_from_slice(bytes);
    }

    /// Writes the accumulated send buffer to the socket in a single binary
    /// message, then clears it. A no-op when nothing is queued, so an idle
    /// tick never produces an empty write.
    pub async fn flush(&mut self) -> ConnectionResult<()> {
        if self.send_buffer.is_empty() {
            return Ok(());
        }
        let bytes = std::mem::take(&mut self.send_buffer);
        self.socket_sender.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    pub async fn close(&mut self, code: u16, reason: &'static str) {
        let frame = CloseFrame {
            code,
            reason: reason.into(),
        };
        if let Err(err) = self.socket_sender.send(Message::Close(Some(frame))).await {
            debug!(ip = %self.client_ip, error = %err, "failed to send close frame");
        }
    }

    /// Applies one already-decoded packet, queuing a paint-result packet
    /// for a `0xFE`. Returns the close code to use on a protocol violation
    /// (an unexpected pong).
    pub async fn handle_decoded_packet(
        &mut self,
        packet: DecodedPacket,
        paint_use_case: &dyn PaintUseCase,
    ) -> Option<u16> {
        match packet {
            DecodedPacket::Paint(paint) => {
                let now = OffsetDateTime::now_utc();
                let result = paint_use_case
                    .try_paint(paint.token, paint.claimed_uid, paint.coord, paint.color, now)
                    .await;
                self.queue_bytes(&protocol::encode_paint_result(paint.request_id, result));
                None
            }
            DecodedPacket::Pong => {
                if !self.waiting_pong {
                    return Some(close_code::PROTOCOL);
                }
                self.waiting_pong = false;
                self.pong_deadline = None;
                self.next_ping_at = Instant::now() + random_ping_delay();
                None
            }
        }
    }

    /// Maps a frame-decoding failure to the close code the caller should
    /// use, logging context about what went wrong.
    pub fn decode_error_close_code(&self, error: DecodeError) -> u16 {
        match error {
            DecodeError::UnknownTag(tag) => {
                warn!(ip = %self.client_ip, tag, "unknown websocket packet tag");
                close_code::PROTOCOL
            }
            DecodeError::Truncated => {
                warn!(ip = %self.client_ip, "truncated websocket packet");
                close_code::PROTOCOL
            }
        }
    }

    pub async fn heartbeat_wait(&mut self) -> HeartbeatEvent {
        match self.pong_deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline.into()).await;
                HeartbeatEvent::PongTimeout
            }
            None => {
                tokio::time::sleep_until(self.next_ping_at.into()).await;
                HeartbeatEvent::PingDue
            }
        }
    }

    pub fn arm_ping(&mut self) {
        self.queue_bytes(&[protocol::TAG_PING]);
        self.waiting_pong = true;
        self.pong_deadline = Some(Instant::now() + PONG_DEADLINE);
    }
}

fn random_ping_delay() -> Duration {
    let seconds = rand::rng().random_range(MIN_PING_DELAY_SECS..MAX_PING_DELAY_SECS);
    Duration::from_secs(seconds)
}
