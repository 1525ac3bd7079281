use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Personal Assistant Bot API is running with Azure OpenAI!",
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    ai_provider: &'static str,
    processor_ready: bool,
}

// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ready = state.processor.is_some();
    Json(HealthResponse {
        status: if ready { "healthy" } else { "degraded" },
        service: "personal-assistant-bot",
        ai_provider: "Azure OpenAI",
        processor_ready: ready,
    })
}
