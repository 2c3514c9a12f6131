//! In-process HTTP driver coverage for the routes that don't need a live
//! paint pipeline behind them.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tokio::sync::broadcast;
use tower::ServiceExt;

use application::ban::service::BanController;
use application::config::RateLimitSettings;
use application::error::AppResult;
use application::infrastructure_config::Config;
use application::ports::incoming::admin::AdminUseCase;
use application::ports::incoming::board::{BoardQueryUseCase, PersistenceUseCase, TickUseCase};
use application::ports::incoming::paint::PaintUseCase;
use application::ports::incoming::tokens::{TokenIssuanceUseCase, TokenIssueError};
use domain::board::DirtyPixel;
use domain::color::RgbColor;
use domain::coords::PixelCoord;
use domain::result_code::ResultCode;
use domain::token::Token;
use paintboard_adapters::incoming::http_axum::routes::build_router;
use paintboard_adapters::outgoing::image_rs::webp_codec::ImageWebpAdapter;
use paintboard_adapters::shared::app_state::AppState;

struct UnusedPaint;

#[async_trait::async_trait]
impl PaintUseCase for UnusedPaint {
    async fn try_paint(
        &self,
        _token_value: uuid::Uuid,
        _claimed_uid: u32,
        _coord: PixelCoord,
        _color: RgbColor,
        _now: time::OffsetDateTime,
    ) -> ResultCode {
        unreachable!("not exercised by this test")
    }
}

struct UnusedBoard;

#[async_trait::async_trait]
impl BoardQueryUseCase for UnusedBoard {
    async fn snapshot(&self) -> Vec<u8> {
        unreachable!("not exercised by this test")
    }
    fn dimensions(&self) -> (u16, u16) {
        (1, 1)
    }
}

#[async_trait::async_trait]
impl TickUseCase for UnusedBoard {
    async fn drain_tick(&self) -> Vec<DirtyPixel> {
        unreachable!("not exercised by this test")
    }
}

#[async_trait::async_trait]
impl PersistenceUseCase for UnusedBoard {
    async fn save_now(&self) -> AppResult<()> {
        unreachable!("not exercised by this test")
    }
}

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

fn test_state() -> AppState {
    let (tick_broadcast, _) = broadcast::channel(16);
    let (close_signal, _) = broadcast::channel(16);
    AppState::new(
        Arc::new(Config::default()),
        Arc::new(UnusedPaint),
        Arc::new(UnusedBoard),
        Arc::new(UnusedBoard),
        Arc::new(UnusedBoard),
        Arc::new(UnusedTokens),
        Arc::new(UnusedAdmin),
        Arc::new(BanController::new(RateLimitSettings {
            max_packet_per_second: 128,
            max_web_socket_per_ip: 0,
            ban_duration: std::time::Duration::from_millis(60_000),
        })),
        tick_broadcast,
        close_signal,
        Arc::new(ImageWebpAdapter::new()),
    )
}

fn loopback_request(uri: &str) -> Request<Body> {
    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn banner_route_returns_plain_text() {
    let router = build_router(test_state());
    let response = router
        .oneshot(loopback_request("/api"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_route_reports_ok() {
    let router = build_router(test_state());
    let response = router
        .oneshot(loopback_request("/api/health"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
}
