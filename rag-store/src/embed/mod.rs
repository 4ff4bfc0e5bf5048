//! Embedding abstraction.
//!
//! Async is required because real providers perform HTTP requests.

use std::{future::Future, pin::Pin};

pub use ai_llm_service::EmbedTask;

use crate::errors::RagError;

pub mod llm;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in another backend or a test double.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds `text` for the given retrieval task.
    fn embed<'a>(
        &'a self,
        text: &'a str,
        task: EmbedTask,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}
