//! Health probes for the configured LLM backends.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - Gemini / Vertex AI: `POST {model_url}:countTokens` (authenticated, no generation cost)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] never fails: errors are mapped
//! to `ok = false`. Provider-specific probes (`try_*`) return strict `Result`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{
        base_endpoint,
        gemini_service::{auth_headers, model_url},
        read_json,
    },
};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Gemini", "Ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe targeted.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single config, routing to the provider-specific probe.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.try_probe_ollama(cfg).await,
            LlmProvider::Gemini | LlmProvider::VertexAi => self.try_probe_google(cfg).await,
        };

        match result {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    model = %cfg.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    model = %cfg.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Checks every config in order.
    pub async fn check_many(&self, configs: &[&LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout)
    }

    /// Strict Ollama probe.
    ///
    /// - `GET {endpoint}/api/tags`, ensure 2xx
    /// - best-effort: verify `cfg.model` exists in the returned tags
    async fn try_probe_ollama(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/api/tags", base_endpoint(cfg)?);
        let start = Instant::now();
        debug!(provider = "Ollama", model = %cfg.model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .send()
            .await?;
        let tags: Tags = read_json(cfg.provider, &url, resp).await?;
        let latency = start.elapsed().as_millis();

        Ok(match tags.models {
            Some(models) if models.iter().any(|m| m.name == cfg.model) => {
                HealthStatus::new(cfg, true, latency, "Ollama is healthy; model is available")
            }
            Some(_) => HealthStatus::new(
                cfg,
                false,
                latency,
                "Ollama is up, but model not found in /api/tags",
            ),
            None => HealthStatus::new(
                cfg,
                true,
                latency,
                "Ollama is healthy; tags response without `models` field",
            ),
        })
    }

    /// Strict Google probe: `:countTokens` on the configured model.
    async fn try_probe_google(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = model_url(cfg, "countTokens")?;
        let headers = auth_headers(cfg)?;
        let start = Instant::now();
        debug!(provider = ?cfg.provider, model = %cfg.model, "POST {}", url);

        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "ping" }] }]
        });
        let resp = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(self.timeout_for(cfg))
            .json(&body)
            .send()
            .await?;
        let out: CountTokens = read_json(cfg.provider, &url, resp).await?;

        Ok(HealthStatus::new(
            cfg,
            true,
            start.elapsed().as_millis(),
            format!("model reachable; countTokens={}", out.total_tokens),
        ))
    }
}

#[derive(Deserialize)]
struct Tag {
    name: String,
}

#[derive(Deserialize)]
struct Tags {
    models: Option<Vec<Tag>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountTokens {
    #[serde(default)]
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_endpoint_maps_to_failed_status() {
        let health = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3.1:8b".into(),
            endpoint: "not-a-url".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
            safety: Vec::new(),
        };

        let status = health.check(&cfg).await;
        assert!(!status.ok);
        assert_eq!(status.provider, "Ollama");
        assert!(status.message.contains("invalid endpoint"));
    }

    #[tokio::test]
    async fn google_without_key_maps_to_failed_status() {
        let health = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-2.0-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
            safety: Vec::new(),
        };

        let status = health.check(&cfg).await;
        assert!(!status.ok);
        assert!(status.message.contains("missing API key"));
    }
}
