/// Intended use of an embedding.
///
/// Google embedding models produce different vectors for queries and for
/// indexed documents; Ollama ignores the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTask {
    /// A user question being matched against the knowledge base.
    Query,
    /// A knowledge-base entry being indexed.
    Document,
}

impl EmbedTask {
    /// Wire value for the Google `task_type` / `taskType` field.
    pub fn as_google(self) -> &'static str {
        match self {
            EmbedTask::Query => "RETRIEVAL_QUERY",
            EmbedTask::Document => "RETRIEVAL_DOCUMENT",
        }
    }
}
