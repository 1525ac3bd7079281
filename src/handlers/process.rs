use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AssistantResponse, UserRequest};
use crate::state::AppState;

// POST /process
pub async fn process_user_input(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserRequest>,
) -> Result<Json<AssistantResponse>, AppError> {
    let processor = state.processor.as_ref().ok_or(AppError::NotInitialized)?;

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, "incoming request");

    let response = processor.process(&request.user_input).await;

    tracing::info!(
        %request_id,
        intent = %response.intent_category,
        "processed input"
    );
    Ok(Json(response))
}

/// Panic boundary for the router: reports the panic message without
/// exposing a backtrace.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown error".to_string()
    };

    tracing::error!(detail = %detail, "request handler panicked");
    AppError::Internal(detail).into_response()
}
