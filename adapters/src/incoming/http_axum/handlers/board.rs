use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::incoming::http_axum::error_mapper::HttpError;
use crate::shared::app_state::AppState;

pub async fn get_board(State(state): State<AppState>) -> Response {
    let bytes = state.board_query_use_case.snapshot().await;
    let mut response = bytes.into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    response
}

pub async fn get_image(State(state): State<AppState>) -> Result<Response, HttpError> {
    let (width, height) = state.board_query_use_case.dimensions();
    let bytes = state.board_query_use_case.snapshot().await;
    let webp = state
        .image_codec
        .encode_lossless_webp(&bytes, width, height)?;

    let mut response = webp.into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("image/webp"));
    Ok(response)
}
