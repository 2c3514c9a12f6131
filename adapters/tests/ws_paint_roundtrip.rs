//! In-process WebSocket coverage driving the protocol through a real TCP
//! loopback socket and the actual `build_router` output, rather than a mock
//! transport — the handshake upgrade can't be driven through
//! `tower::ServiceExt::oneshot` alone, so this binds an ephemeral port on
//! `127.0.0.1` instead of a routable one.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use application::ban::service::BanController;
use application::board::service::BoardService;
use application::config::RateLimitSettings;
use application::error::AppResult;
use application::infrastructure_config::Config;
use application::paint::service::PaintEngine;
use application::ports::incoming::admin::AdminUseCase;
use application::ports::incoming::board::{BoardQueryUseCase, PersistenceUseCase, TickUseCase};
use application::ports::incoming::paint::PaintUseCase;
use application::ports::incoming::tokens::{TokenIssuanceUseCase, TokenIssueError};
use application::tokens::service::TokenRegistryService;
use domain::board::Board;
use domain::token::Token;
use paintboard_adapters::incoming::http_axum::routes::build_router;
use paintboard_adapters::outgoing::image_rs::webp_codec::ImageWebpAdapter;
use paintboard_adapters::outgoing::sqlite_storage::null_storage::NullStorageAdapter;
use paintboard_adapters::shared::app_state::AppState;

struct UnusedTokens;

#[async_trait::async_trait]
impl TokenIssuanceUseCase for UnusedTokens {
    async fn generate_token(
        &self,
        _uid: u32,
        _paste_id: &str,
    ) -> AppResult<Result<Token, TokenIssueError>> {
        unreachable!("not exercised by this test")
    }
}

struct UnusedAdmin;

#[async_trait::async_trait]
impl AdminUseCase for UnusedAdmin {
    fn authorize(&self, _token: &str) -> bool {
        unreachable!("not exercised by this test")
    }
    async fn ban_uid(&self, _uid: u32) {
        unreachable!("not exercised by this test")
    }
    async fn unban_uid(&self, _uid: u32) {
        unreachable!("not exercised by this test")
    }
}

struct NoopPersistence;

#[async_trait::async_trait]
impl PersistenceUseCase for NoopPersistence {
    async fn save_now(&self) -> AppResult<()> {
        Ok(())
    }
}

/// A real paint pipeline (board W=4, H=2, paintDelay=1000ms, per §8's
/// worked examples) wired against a null storage backend and a live axum
/// server bound to an ephemeral loopback port.
async fn spawn_test_server(max_packet_per_second: u32) -> (SocketAddr, Arc<TokenRegistryService>) {
    let board = Arc::new(Board::blank(4, 2));
    let storage = Arc::new(NullStorageAdapter);
    let token_registry = Arc::new(TokenRegistryService::new(storage));

    let rate_limit_settings = RateLimitSettings {
        max_packet_per_second,
        max_web_socket_per_ip: 0,
        ban_duration: Duration::from_millis(60_000),
    };
    let ban_controller = Arc::new(BanController::new(rate_limit_settings));

    let paint_engine: Arc<dyn PaintUseCase> = Arc::new(PaintEngine::new(
        Arc::clone(&board),
        Arc::clone(&token_registry),
        Arc::clone(&ban_controller),
        Duration::from_millis(1000),
    ));

    let board_service = Arc::new(BoardService::new(Arc::clone(&board)));
    let board_query_use_case: Arc<dyn BoardQueryUseCase> = Arc::clone(&board_service) as _;
    let tick_use_case: Arc<dyn TickUseCase> = Arc::clone(&board_service) as _;

    let persistence_use_case: Arc<dyn PersistenceUseCase> = Arc::new(NoopPersistence);

    let (tick_broadcast, _) = broadcast::channel(16);
    let (close_signal, _) = broadcast::channel(16);

    let state = AppState::new(
        Arc::new(Config::default()),
        paint_engine,
        board_query_use_case,
        tick_use_case,
        persistence_use_case,
        Arc::new(UnusedTokens),
        Arc::new(UnusedAdmin),
        ban_controller,
        tick_broadcast,
        close_signal,
        Arc::new(ImageWebpAdapter::new()),
    );

    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("listener has a local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server task");
    });

    (addr, token_registry)
}

fn encode_paint_packet(x: u16, y: u16, color: [u8; 3], uid: u32, token: Token, request_id: u32) -> Vec<u8> {
    let mut bytes = vec![0xFEu8];
    bytes.extend_from_slice(&x.to_le_bytes());
    bytes.extend_from_slice(&y.to_le_bytes());
    bytes.extend_from_slice(&color);
    bytes.extend_from_slice(&uid.to_le_bytes()[..3]);
    bytes.extend_from_slice(token.value().as_bytes());
    bytes.extend_from_slice(&request_id.to_le_bytes());
    bytes
}

#[tokio::test]
async fn s1_happy_paint_round_trips_over_a_real_websocket() {
    let (addr, token_registry) = spawn_test_server(128).await;
    let token = token_registry.issue(42).await.expect("issue succeeds");

    let (mut ws, _response) = connect_async(format!("ws://{addr}/api/paintboard/ws"))
        .await
        .expect("websocket handshake succeeds");

    let packet = encode_paint_packet(1, 0, [255, 0, 0], 42, token, 7);
    ws.send(WsMessage::Binary(packet.into()))
        .await
        .expect("send paint packet");

    let reply = ws
        .next()
        .await
        .expect("stream stays open for the reply")
        .expect("clean frame");
    let WsMessage::Binary(bytes) = reply else {
        panic!("expected a binary paint-result reply");
    };
    assert_eq!(bytes.to_vec(), vec![0xFF, 0x07, 0x00, 0x00, 0x00, 0xEF]);
}

#[tokio::test]
async fn s6_rate_limit_ban_closes_every_connection_from_the_ip() {
    let (addr, token_registry) = spawn_test_server(5).await;
    let token = token_registry.issue(42).await.expect("issue succeeds");

    let url = format!("ws://{addr}/api/paintboard/ws");
    let (mut offender, _) = connect_async(&url).await.expect("offender connects");
    let (mut sibling, _) = connect_async(&url).await.expect("sibling connects");

    // Gives the sibling's connection task time to subscribe to
    // `close_signal` before the offender trips the ban below.
    tokio::time::sleep(Duration::from_millis(50)).await;

    for request_id in 0..6u32 {
        let packet = encode_paint_packet(0, 0, [1, 2, 3], 42, token, request_id);
        offender
            .send(WsMessage::Binary(packet.into()))
            .await
            .expect("send paint packet");
    }

    let offender_close = loop {
        match offender.next().await.expect("offender stream stays open") {
            Ok(WsMessage::Close(Some(frame))) => break frame.code,
            Ok(_) => continue,
            Err(err) => panic!("offender stream errored before closing: {err}"),
        }
    };
    assert_eq!(u16::from(offender_close), 1013);

    let sibling_close = loop {
        match sibling.next().await.expect("sibling stream stays open") {
            Ok(WsMessage::Close(Some(frame))) => break frame.code,
            Ok(_) => continue,
            Err(err) => panic!("sibling stream errored before closing: {err}"),
        }
    };
    assert_eq!(u16::from(sibling_close), 1013);
}
