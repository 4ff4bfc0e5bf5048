//! Shared LLM service for the ADS chatbot.
//!
//! - [`config`]: provider selection, model configs, safety settings, env loading
//! - [`services`]: thin HTTP clients for Gemini/Vertex AI and Ollama
//! - [`service_profiles`]: the process-wide `chat` + `embedding` pair
//! - [`health_service`]: best-effort provider probes
//! - [`telemetry`]: formatting layer shared by every binary in the workspace

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::embed_task::EmbedTask;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use config::safety::{HarmBlockThreshold, HarmCategory, SafetySetting};
pub use error_handler::{AiLlmError, ConfigError};
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
