use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("LLM configuration error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    #[error("FAQ store configuration error: {0}")]
    Rag(#[from] rag_store::RagError),

    #[error("guard policy error: {0}")]
    Guard(#[from] guardrails::GuardError),

    #[error("interaction log error: {0}")]
    InteractionLog(#[from] chat_orchestrator::PipelineError),

    #[error("invalid listen address {0:?}")]
    Address(String),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) | AppError::Rag(_) | AppError::Guard(_) => "CONFIG_ERROR",
            AppError::InteractionLog(_) => "LOG_ERROR",
            AppError::Address(_) | AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// All variants are startup/server failures; details are logged, not returned.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = ErrorBody {
            error: self.error_code(),
            message: "internal server error".into(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Handy result alias used during startup.
pub type AppResult<T> = Result<T, AppError>;
