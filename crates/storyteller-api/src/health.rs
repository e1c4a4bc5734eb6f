use axum::{Json, extract::State};

use storyteller_types::api::HealthResponse;

use crate::AppState;

/// GET /health: Liveness plus whether a completion API key is configured.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let openai_api = if state.completion_configured {
        "available"
    } else {
        "missing"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        openai_api: openai_api.to_string(),
    })
}
