use axum::Json;
use axum::extract::State;
use cryptonews_core::SCHEMA_VERSION;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub schema_version: &'static str,
    pub model_version: String,
    pub persistence: bool,
}

/// Liveness probe: `GET /health`. Never requires auth.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        schema_version: SCHEMA_VERSION,
        model_version: state.classifier.config().model_version.clone(),
        persistence: state.store.is_some(),
    })
}
