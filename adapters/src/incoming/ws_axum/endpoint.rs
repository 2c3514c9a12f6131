use axum::extract::ws::close_code;
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::http::Request;
use axum::response::Response;
use std::net::SocketAddr;
use time::OffsetDateTime;

use application::ban::service::ConnectionAdmission;

use crate::shared::app_state::AppState;

use super::connection::Connection;
use super::handler::ConnectionHandler;
use super::ip_utils::extract_client_ip;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<axum::body::Body>,
) -> Response {
    let client_ip = extract_client_ip(&request, Some(addr), false);
    let now = OffsetDateTime::now_utc();

    if state.ban_controller.ip_ban_remaining(client_ip, now).is_some() {
        // §4.4/§6: a banned IP's WS open is closed immediately with 1008,
        // not rejected with an HTTP status — the handshake still completes.
        return ws.on_upgrade(move |socket| async move {
            let (mut connection, _receiver) = Connection::new(socket, client_ip);
            connection.close(close_code::POLICY, "ip banned").await;
        });
    }

    let admission = state.ban_controller.register_connection(client_ip, now);

    ws.on_upgrade(move |socket| async move {
        if admission == ConnectionAdmission::LimitExceeded {
            let (mut connection, _receiver) = Connection::new(socket, client_ip);
            connection
                .close(close_code::POLICY, "too many connections from this ip")
                .await;
            let _ = state.close_signal.send((client_ip, close_code::POLICY));
            state.ban_controller.release_connection(client_ip);
            return;
        }

        ConnectionHandler::new(socket, &state, client_ip)
            .run(state.clone())
            .await;
    })
}
