use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use application::error::AppError;

pub struct HttpError(pub AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let (status_code, message) = match app_error {
            AppError::Domain(_) | AppError::UidMismatch | AppError::ContentMismatch => {
                debug!("client error response generated: {}", app_error);
                (StatusCode::BAD_REQUEST, app_error.to_string())
            }

            AppError::PasteNotFound | AppError::UidNotAllowed => {
                debug!("client error response generated: {}", app_error);
                (StatusCode::FORBIDDEN, app_error.to_string())
            }

            AppError::Unauthorized => {
                debug!("client error response generated: {}", app_error);
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }

            AppError::ConfigError { .. } => {
                error!("server error response generated: {}", app_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration error".to_string(),
                )
            }

            AppError::StorageError { .. } => {
                error!("server error response generated: {}", app_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage error".to_string(),
                )
            }

            AppError::PasteTransportError { .. } => {
                error!("server error response generated: {}", app_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "paste validation service unavailable".to_string(),
                )
            }

            AppError::CodecError { .. } => {
                error!("server error response generated: {}", app_error);
                (StatusCode::INTERNAL_SERVER_ERROR, "codec error".to_string())
            }
        };

        let error_response = json!({
            "statusCode": status_code.as_u16(),
            "data": { "error": message }
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
