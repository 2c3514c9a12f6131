use axum::Router;

use paintboard_adapters::incoming::http_axum::routes::build_router;
use paintboard_adapters::shared::app_state::AppState;

pub fn create_router(state: AppState) -> Router {
    build_router(state)
}
