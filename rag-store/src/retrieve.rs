//! Retrieval: embed the question, search Qdrant, map payloads to FAQ hits.

use serde_json::Value;
use tracing::{trace, warn};

use crate::config::RagConfig;
use crate::embed::{EmbedTask, EmbeddingsProvider};
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::FaqHit;

/// Top-`top_k` FAQ hits for a free-text question, best first.
///
/// # Errors
/// Embedding/provider errors or Qdrant failures.
pub async fn search_faqs(
    cfg: &RagConfig,
    client: &QdrantFacade,
    query: &str,
    top_k: u64,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<FaqHit>, RagError> {
    let qv = provider.embed(query, EmbedTask::Query).await?;
    let raw = client.search(qv, top_k, cfg.exact_search).await?;
    let hits = hits_from_payloads(raw);

    trace!(top_k, hits = hits.len(), "retrieve::search_faqs");
    Ok(hits)
}

/// Keeps scored payloads that carry both `question` and `answer`, preserving order.
pub(crate) fn hits_from_payloads(raw: Vec<(f32, Value)>) -> Vec<FaqHit> {
    raw.into_iter()
        .filter_map(|(score, payload)| {
            let field = |k: &str| payload.get(k).and_then(Value::as_str).map(str::to_string);
            match (field("question"), field("answer")) {
                (Some(question), Some(answer)) => Some(FaqHit {
                    score,
                    question,
                    answer,
                }),
                _ => {
                    warn!(score, "skipping hit without question/answer payload");
                    None
                }
            }
        })
        .collect()
}
