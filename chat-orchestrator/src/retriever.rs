//! Retrieval seam and its FAQ-store implementation.

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, FaqStore};
use tracing::debug;

use crate::{BoxFuture, error::PipelineError, types::ContextSnippet};

/// Returns up to `top_k` snippets for a question, best first.
pub trait Retriever: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, Result<Vec<ContextSnippet>, PipelineError>>;
}

/// [`Retriever`] over the Qdrant-backed [`FaqStore`].
pub struct FaqRetriever {
    store: Arc<FaqStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl FaqRetriever {
    pub fn new(store: Arc<FaqStore>, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { store, embedder }
    }
}

impl Retriever for FaqRetriever {
    fn search<'a>(
        &'a self,
        query: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, Result<Vec<ContextSnippet>, PipelineError>> {
        Box::pin(async move {
            let hits = self
                .store
                .search(query, top_k as u64, self.embedder.as_ref())
                .await?;
            debug!(
                hits = hits.len(),
                best_score = hits.first().map(|h| h.score).unwrap_or(0.0),
                "FAQ search done"
            );
            Ok(hits
                .into_iter()
                .map(|h| ContextSnippet::new(h.question, h.answer))
                .collect())
        })
    }
}
