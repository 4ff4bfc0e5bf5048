use std::{env, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use chat_orchestrator::{
    ChatOrchestrator, FaqRetriever, GroundedGenerator, InteractionLog, JsonlInteractionLog,
    OrchestratorConfig, TeeInteractionLog, TracingInteractionLog,
};
use guardrails::{GuardPolicy, Guardrails};
use rag_store::{FaqStore, LlmEmbedder, RagConfig};
use tracing::info;

use crate::error_handler::AppResult;

pub const DEFAULT_SERVICE_NAME: &str = "ADS Chatbot";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Guarded RAG pipeline; holds the only references to the backend clients.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Model profiles, kept for backend health probes. `None` when the
    /// pipeline was assembled from custom collaborators.
    pub llm: Option<Arc<LlmServiceProfiles>>,
    /// Reported by `GET /api/health`.
    pub service_name: String,
}

impl AppState {
    pub fn new(orchestrator: Arc<ChatOrchestrator>, service_name: impl Into<String>) -> Self {
        Self {
            orchestrator,
            llm: None,
            service_name: service_name.into(),
        }
    }

    /// Builds every client once from environment variables and wires the pipeline.
    ///
    /// # Errors
    /// Any missing or invalid setting aborts startup.
    pub async fn from_env() -> AppResult<Self> {
        let guard = match env::var("GUARD_POLICY_PATH") {
            Ok(path) if !path.trim().is_empty() => {
                Guardrails::new(GuardPolicy::from_json_file(path.trim())?)
            }
            _ => Guardrails::default(),
        };

        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let rag_cfg = RagConfig::from_env()?;
        let embedder = Arc::new(LlmEmbedder::new(llm.clone(), rag_cfg.embedding_dim));
        let store = Arc::new(FaqStore::new(rag_cfg)?);

        let retriever = Arc::new(FaqRetriever::new(store, embedder));
        let generator = Arc::new(GroundedGenerator::new(llm.clone()));
        let log = interaction_log_from_env().await?;

        let cfg = OrchestratorConfig::from_env();
        let (chat, embedding) = llm.profiles();
        info!(
            provider = ?chat.provider,
            chat_model = %chat.model,
            embedding_model = %embedding.model,
            top_k = cfg.top_k,
            "pipeline ready"
        );

        let orchestrator = ChatOrchestrator::new(guard, retriever, generator, log, cfg);
        let service_name = env::var("SERVICE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            llm: Some(llm),
            service_name,
        })
    }
}

/// Tracing sink, plus a JSONL file when `INTERACTION_LOG_PATH` is set.
async fn interaction_log_from_env() -> AppResult<Arc<dyn InteractionLog>> {
    let tracing_sink: Arc<dyn InteractionLog> = Arc::new(TracingInteractionLog);
    match env::var("INTERACTION_LOG_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let file = JsonlInteractionLog::open(path.trim()).await?;
            info!(path = %path.trim(), "interaction log file opened");
            Ok(Arc::new(TeeInteractionLog::new(vec![
                tracing_sink,
                Arc::new(file),
            ])))
        }
        _ => Ok(tracing_sink),
    }
}
