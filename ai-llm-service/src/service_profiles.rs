//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - HTTP clients are built eagerly, so misconfiguration fails at startup
//!   instead of on the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{EmbedTask, LlmServiceProfiles};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let txt = svc.generate("When is my road plowed?", Some("Answer briefly.")).await?;
//! let emb = svc.embed("road plowing schedule", EmbedTask::Query).await?;
//! println!("{txt} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{
        default_config::{config_chat_from_env, config_embedding_from_env},
        embed_task::EmbedTask,
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{gemini_service::GeminiService, ollama_service::OllamaService},
};

/// One ready-to-use client for a profile.
enum ProviderClient {
    Google(GeminiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::Gemini | LlmProvider::VertexAi => {
                ProviderClient::Google(GeminiService::new(cfg.clone())?)
            }
        })
    }
}

/// Process-wide pair of **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat_cfg: LlmModelConfig,
    embedding_cfg: LlmModelConfig,
    chat: ProviderClient,
    embedding: ProviderClient,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service and builds one client per profile.
    ///
    /// # Errors
    /// Any provider/endpoint/credential problem in either profile.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let chat_client = ProviderClient::build(&chat)?;
        let embedding_client = ProviderClient::build(&embedding)?;

        info!(
            chat_provider = ?chat.provider,
            chat_model = %chat.model,
            embedding_model = %embedding.model,
            "LLM profiles ready"
        );

        Ok(Self {
            chat_cfg: chat,
            embedding_cfg: embedding,
            chat: chat_client,
            embedding: embedding_client,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Loads both profiles from the environment (see [`crate::config::default_config`]).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_chat_from_env()?, config_embedding_from_env()?, Some(10))
    }

    /// Generates text with the **chat** profile.
    ///
    /// `system` is sent as the provider's system instruction.
    /// An empty string means the model produced no text (e.g. safety-blocked).
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.chat {
            ProviderClient::Google(cli) => cli.generate(prompt, system).await,
            ProviderClient::Ollama(cli) => cli.generate(prompt, system).await,
        }
    }

    /// Computes an embedding with the **embedding** profile.
    pub async fn embed(&self, input: &str, task: EmbedTask) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            ProviderClient::Google(cli) => cli.embeddings(input, task).await,
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
        }
    }

    /// Health snapshot for each distinct profile.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        if self.chat_cfg == self.embedding_cfg {
            self.health.check_many(&[&self.chat_cfg]).await
        } else {
            self.health
                .check_many(&[&self.chat_cfg, &self.embedding_cfg])
                .await
        }
    }

    /// Returns `(chat, embedding)` profiles.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat_cfg, &self.embedding_cfg)
    }
}
