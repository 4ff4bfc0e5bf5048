//! Chat and embedding configs loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `gemini` (default) | `vertex` | `ollama`
//! - `LLM_TEMPERATURE`   = sampling temperature, `0.0..=2.0` (default `0.7`)
//! - `LLM_MAX_TOKENS`    = max output tokens (default `1024`)
//! - `LLM_TIMEOUT_SECS`  = per-request timeout (default `60`)
//! - `EMBEDDING_MODEL`   = embedding model (defaults per provider, required for Ollama)
//!
//! Gemini API:
//! - `GEMINI_API_KEY`    (required)
//! - `GEMINI_ENDPOINT`   (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_MODEL`      (default `gemini-2.0-flash`)
//!
//! Vertex AI:
//! - `GOOGLE_CLOUD_PROJECT`  (required)
//! - `GOOGLE_CLOUD_LOCATION` (default `us-central1`)
//! - `GOOGLE_ACCESS_TOKEN`   (required, OAuth bearer token)
//! - `VERTEX_ENDPOINT`       (optional full override of the publisher base URL)
//! - `GEMINI_MODEL`
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` (one is required)
//! - `OLLAMA_MODEL` (required)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider, safety::SafetySetting},
    error_handler::{
        AiLlmError, ConfigError, Lookup, must_var, opt_number, opt_var, process_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_VERTEX_LOCATION: &str = "us-central1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat profile from the process environment.
pub fn config_chat_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_chat_with(&process_env)
}

/// Embedding profile from the process environment.
pub fn config_embedding_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_with(&process_env)
}

/// Builds the **chat** profile used for grounded generation.
///
/// # Defaults
/// - `temperature = 0.7`, `max_tokens = 1024`, `timeout_secs = 60`
/// - safety: medium-and-above blocked for all four harm categories
pub fn config_chat_with(lookup: Lookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_with(lookup)?;
    let (endpoint, api_key) = target_with(lookup, provider)?;

    let model = match provider {
        LlmProvider::Ollama => must_var(lookup, "OLLAMA_MODEL")?,
        _ => opt_var(lookup, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
    };

    let temperature = opt_number::<f32>(lookup, "LLM_TEMPERATURE", "expected f32")?
        .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    let max_tokens =
        opt_number::<u32>(lookup, "LLM_MAX_TOKENS", "expected u32")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout_secs = opt_number::<u64>(lookup, "LLM_TIMEOUT_SECS", "expected u64")?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
        safety: SafetySetting::block_medium_and_above(),
    })
}

/// Builds the **embedding** profile used for query and document vectors.
///
/// # Defaults
/// - model: `text-embedding-004` (Gemini), `text-embedding-005` (Vertex AI)
/// - `timeout_secs = 30`, deterministic (no sampling knobs)
pub fn config_embedding_with(lookup: Lookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_with(lookup)?;
    let (endpoint, api_key) = target_with(lookup, provider)?;

    let model = match provider {
        LlmProvider::Ollama => must_var(lookup, "EMBEDDING_MODEL")?,
        LlmProvider::Gemini => {
            opt_var(lookup, "EMBEDDING_MODEL").unwrap_or_else(|| "text-embedding-004".into())
        }
        LlmProvider::VertexAi => {
            opt_var(lookup, "EMBEDDING_MODEL").unwrap_or_else(|| "text-embedding-005".into())
        }
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
        safety: Vec::new(),
    })
}

/// Vertex AI publisher base URL for a project/location.
pub fn vertex_endpoint(project: &str, location: &str) -> String {
    format!(
        "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google"
    )
}

fn provider_with(lookup: Lookup<'_>) -> Result<LlmProvider, AiLlmError> {
    match opt_var(lookup, "LLM_KIND") {
        Some(kind) => Ok(kind.parse::<LlmProvider>()?),
        None => Ok(LlmProvider::Gemini),
    }
}

/// Resolves `(endpoint, api_key)` for a provider.
fn target_with(
    lookup: Lookup<'_>,
    provider: LlmProvider,
) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Gemini => {
            let endpoint = opt_var(lookup, "GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.into());
            validate_http_endpoint("GEMINI_ENDPOINT", &endpoint)?;
            let key = must_var(lookup, "GEMINI_API_KEY")?;
            Ok((endpoint, Some(key)))
        }
        LlmProvider::VertexAi => {
            let endpoint = match opt_var(lookup, "VERTEX_ENDPOINT") {
                Some(e) => {
                    validate_http_endpoint("VERTEX_ENDPOINT", &e)?;
                    e
                }
                None => {
                    let project = must_var(lookup, "GOOGLE_CLOUD_PROJECT")?;
                    let location = opt_var(lookup, "GOOGLE_CLOUD_LOCATION")
                        .unwrap_or_else(|| DEFAULT_VERTEX_LOCATION.into());
                    vertex_endpoint(&project, &location)
                }
            };
            let token = must_var(lookup, "GOOGLE_ACCESS_TOKEN")?;
            Ok((endpoint, Some(token)))
        }
        LlmProvider::Ollama => Ok((ollama_endpoint(lookup)?, None)),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint(lookup: Lookup<'_>) -> Result<String, AiLlmError> {
    if let Some(url) = opt_var(lookup, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_number::<u16>(lookup, "OLLAMA_PORT", "expected u16 (1..=65535)")? {
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}
