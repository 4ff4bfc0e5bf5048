//! Thin HTTP clients, one per wire protocol.
//!
//! - [`gemini_service`]: `generateContent` / embeddings / `countTokens` for the
//!   Gemini API and Vertex AI (same JSON, different URL layout and auth)
//! - [`ollama_service`]: local Ollama `/api/generate` and `/api/embeddings`

pub mod gemini_service;
pub mod ollama_service;

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Fallback request timeout when the profile does not set one.
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Returns the endpoint without a trailing slash, or an error if it is not http(s).
pub(crate) fn base_endpoint(cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
    let endpoint = cfg.endpoint.trim();
    if endpoint.is_empty()
        || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        return Err(ProviderError::new(
            cfg.provider,
            ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
        )
        .into());
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}

/// Builds a reusable client with the profile timeout and default headers.
pub(crate) fn http_client(
    cfg: &LlmModelConfig,
    headers: HeaderMap,
) -> Result<reqwest::Client, AiLlmError> {
    let timeout = cfg
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .default_headers(headers)
        .build()?)
}

/// Checks the status and decodes the JSON body.
///
/// # Errors
/// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses (body snippet attached)
/// - [`ProviderErrorKind::Decode`] if the body does not match `T`
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: LlmProvider,
    url: &str,
    resp: reqwest::Response,
) -> Result<T, AiLlmError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);
        error!(?provider, %url, %status, %snippet, "upstream returned non-success status");
        return Err(ProviderError::new(
            provider,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
        .into());
    }

    resp.json::<T>().await.map_err(|e| {
        ProviderError::new(provider, ProviderErrorKind::Decode(format!("serde error: {e}"))).into()
    })
}
