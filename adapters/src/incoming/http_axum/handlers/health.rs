use axum::Json;
use serde_json::{Value, json};

pub async fn get_health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
