//! Embedding provider backed by the shared `ai-llm-service` embedding profile.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::trace;

use crate::{
    embed::{EmbedTask, EmbeddingsProvider},
    errors::RagError,
};

/// Embeds through [`LlmServiceProfiles::embed`], optionally enforcing a dimension.
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: Option<usize>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
        task: EmbedTask,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embed(text, task).await?;
            trace!(dim = v.len(), ?task, "embedded text");

            if let Some(want) = self.dim {
                if v.len() != want {
                    return Err(RagError::VectorSizeMismatch { got: v.len(), want });
                }
            }
            Ok(v)
        })
    }
}
