use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::incoming::http_axum::dto::admin::BanUidRequest;
use crate::shared::app_state::AppState;

pub async fn post_ban_uid(
    State(state): State<AppState>,
    Json(request): Json<BanUidRequest>,
) -> Response {
    handle_admin_request(&state, &request, true).await
}

pub async fn post_unban_uid(
    State(state): State<AppState>,
    Json(request): Json<BanUidRequest>,
) -> Response {
    handle_admin_request(&state, &request, false).await
}

async fn handle_admin_request(state: &AppState, request: &BanUidRequest, ban: bool) -> Response {
    if !state.admin_use_case.authorize(&request.token) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "statusCode": 401, "data": { "error": "unauthorized" } })),
        )
            .into_response();
    }

    if ban {
        state.admin_use_case.ban_uid(request.uid).await;
    } else {
        state.admin_use_case.unban_uid(request.uid).await;
    }

    (
        StatusCode::OK,
        Json(json!({ "statusCode": 200, "data": {} })),
    )
        .into_response()
}
