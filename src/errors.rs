use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures inside the classification pipeline. None of these reach an HTTP
/// caller: the processor turns them into the fallback response.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("unknown intent category: {0:?}")]
    UnknownIntent(String),

    #[error("web search degraded: {failed} of {total} queries failed")]
    SearchDegraded { failed: usize, total: usize },
}

impl PipelineError {
    pub fn transport(err: anyhow::Error) -> Self {
        PipelineError::Transport(format!("{err:#}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("Service not properly initialized")]
    NotInitialized,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotInitialized => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "detail": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
