//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One FAQ entry as provisioned from JSONL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaqRecord {
    /// Optional stable identifier; the question is used when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    /// Optional precomputed document embedding.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl FaqRecord {
    /// Text that is embedded and stored as `content`.
    pub fn content(&self) -> String {
        format!("Question: {} Answer: {}", self.question, self.answer)
    }

    /// Deterministic point id, so re-provisioning overwrites instead of duplicating.
    pub fn point_id(&self) -> Uuid {
        let key = self.id.as_deref().unwrap_or(&self.question);
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
    }
}

/// A single retrieval hit in score order.
#[derive(Clone, Debug, PartialEq)]
pub struct FaqHit {
    pub score: f32,
    pub question: String,
    pub answer: String,
}
