use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::incoming::http_axum::handlers::{admin, banner, board, health, token};
use crate::incoming::http_axum::middleware::ip_ban::ip_ban_middleware;
use crate::incoming::ws_axum::endpoint::websocket_handler;
use crate::shared::app_state::AppState;

/// Builds the full HTTP + WebSocket router. `OPTIONS *` CORS preflight is
/// handled by the permissive `CorsLayer`, not a dedicated route.
///
/// `ip_ban_middleware` only wraps the plain HTTP routes: a banned IP gets
/// 429 there (§4.4), but the WS route handles its own ban check so it can
/// complete the handshake and close with 1008 instead (§4.4/§6), which the
/// 429-returning middleware would otherwise preempt.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let compression = CompressionLayer::new().gzip(true);

    let http_routes = Router::new()
        .route("/api", get(banner::get_banner))
        .route("/api/health", get(health::get_health))
        .route(
            "/api/paintboard/getboard",
            get(board::get_board).layer(compression),
        )
        .route("/api/paintboard/getimage", get(board::get_image))
        .route("/api/auth/gettoken", post(token::post_get_token))
        .route("/api/root/banuid", post(admin::post_ban_uid))
        .route("/api/root/unbanuid", post(admin::post_unban_uid))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            ip_ban_middleware,
        ));

    let ws_route = Router::new().route("/api/paintboard/ws", get(websocket_handler));

    http_routes
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
