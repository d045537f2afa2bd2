use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "sessions": state.sessions.len().await,
            "generation": state.generator.provider_name(),
            "email": state.notifier.provider_name(),
        })),
    )
}
