//! Runtime and collection configuration.
//!
//! # Environment variables
//! - `QDRANT_URL`         (default `http://127.0.0.1:6334`, gRPC port)
//! - `QDRANT_API_KEY`     (optional, Qdrant Cloud)
//! - `QDRANT_COLLECTION`  (default `ads_faqs`)
//! - `QDRANT_BATCH_SIZE`  (default `256`)
//! - `RAG_EXACT_SEARCH`   (`1`/`true` disables HNSW, default off)
//! - `EMBEDDING_DIM`      (optional, checked against every vector)

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";
pub const DEFAULT_COLLECTION: &str = "ads_faqs";

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for FAQ ingestion and retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimension, if known up front.
    pub embedding_dim: Option<usize>,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            embedding_dim: None,
        }
    }

    /// Loads the config from the process environment.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Loads the config from an arbitrary variable source.
    ///
    /// # Errors
    /// [`RagError::Config`] for unparsable numbers or an invalid result.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| -> Result<Option<usize>, RagError> {
            var(name)
                .map(|v| {
                    v.trim()
                        .parse::<usize>()
                        .map_err(|e| RagError::Config(format!("{name}: {e}")))
                })
                .transpose()
        };

        let mut cfg = Self::new_default(
            var("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.into()),
            var("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
        );
        cfg.qdrant_api_key = var("QDRANT_API_KEY");
        if let Some(batch) = number("QDRANT_BATCH_SIZE")? {
            cfg.upsert_batch = batch;
        }
        cfg.exact_search = var("RAG_EXACT_SEARCH")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        cfg.embedding_dim = number("EMBEDDING_DIM")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}
