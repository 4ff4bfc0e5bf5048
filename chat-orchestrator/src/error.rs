//! Typed error for the orchestrator's collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Errors from the FAQ store (embedding or Qdrant).
    #[error("retrieval error: {0}")]
    Retrieval(#[from] rag_store::RagError),

    /// Errors from the hosted model.
    #[error("generation error: {0}")]
    Generation(#[from] ai_llm_service::AiLlmError),

    /// Interaction log could not be written.
    #[error("log sink error: {0}")]
    LogSink(#[from] std::io::Error),

    /// JSON serialization of a log entry.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything raised by a custom collaborator.
    #[error("{0}")]
    Other(String),
}
