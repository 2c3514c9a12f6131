use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use time::OffsetDateTime;

use crate::incoming::ws_axum::ip_utils::extract_client_ip;
use crate::shared::app_state::AppState;

/// Rejects every request from a currently IP-banned client with 429 and a
/// `Retry-After` header, before it reaches routing.
pub async fn ip_ban_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(&request, Some(addr), false);
    let now = OffsetDateTime::now_utc();

    if let Some(remaining) = state.ban_controller.ip_ban_remaining(client_ip, now) {
        let retry_after = remaining.as_secs().max(1);
        let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}
