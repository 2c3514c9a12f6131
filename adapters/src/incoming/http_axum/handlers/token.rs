use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::incoming::http_axum::dto::token::{
    GetTokenRejectedBody, GetTokenRejectedData, GetTokenSuccessBody, GetTokenSuccessData,
    GetTokenRequest, error_type_for,
};
use crate::incoming::http_axum::error_mapper::HttpError;
use crate::shared::app_state::AppState;

pub async fn post_get_token(
    State(state): State<AppState>,
    Json(request): Json<GetTokenRequest>,
) -> Result<Response, HttpError> {
    let outcome = state
        .token_issuance_use_case
        .generate_token(request.uid, &request.paste)
        .await?;

    let response = match outcome {
        Ok(token) => (
            StatusCode::OK,
            Json(GetTokenSuccessBody {
                status_code: 200,
                data: GetTokenSuccessData {
                    token: token.to_canonical_string(),
                },
            }),
        )
            .into_response(),
        Err(rejection) => (
            StatusCode::FORBIDDEN,
            Json(GetTokenRejectedBody {
                status_code: 403,
                data: GetTokenRejectedData {
                    error_type: error_type_for(rejection),
                },
            }),
        )
            .into_response(),
    };

    Ok(response)
}
