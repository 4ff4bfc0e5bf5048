//! FAQ knowledge base over Qdrant.
//!
//! - Provision FAQ rows from JSONL or CSV with precomputed or on-the-fly embeddings
//! - Retrieve the top-K FAQ entries for a user question

mod config;
mod embed;
mod errors;
mod ingest;
mod io_csv;
mod io_jsonl;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use embed::{EmbedTask, EmbeddingsProvider, llm::LlmEmbedder};
pub use errors::RagError;
pub use ingest::read_faq_file;
pub use io_csv::read_faq_csv;
pub use io_jsonl::read_faq_records;
pub use record::{FaqHit, FaqRecord};

use tracing::{debug, trace};

/// Single entry point for application code: configuration plus Qdrant client.
pub struct FaqStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
}

impl FaqStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` / `RagError::Qdrant` if the client cannot be built.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        trace!(collection = %cfg.collection, "FaqStore::new");
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// Provisions FAQ rows from a JSONL or CSV file; returns the number of points written.
    ///
    /// # Errors
    /// I/O, parse, vector size mismatch, embedding or Qdrant failures.
    pub async fn ingest_file(
        &self,
        faq_path: impl AsRef<std::path::Path>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<usize, RagError> {
        debug!(path = ?faq_path.as_ref(), "FaqStore::ingest_file");
        ingest::ingest_file(&self.cfg, faq_path, provider, &self.client).await
    }

    /// Top-`top_k` FAQ entries for `query`, best first.
    ///
    /// # Errors
    /// Embedding errors or Qdrant failures.
    pub async fn search(
        &self,
        query: &str,
        top_k: u64,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<FaqHit>, RagError> {
        retrieve::search_faqs(&self.cfg, &self.client, query, top_k, provider).await
    }
}
