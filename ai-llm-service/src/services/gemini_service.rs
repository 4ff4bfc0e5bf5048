//! Client for Google's `generateContent` family (Gemini API and Vertex AI).
//!
//! Both backends accept the same request/response JSON; they differ only in
//! URL layout and authentication:
//!
//! | provider  | model URL                                          | auth               |
//! |-----------|----------------------------------------------------|--------------------|
//! | Gemini    | `{endpoint}/v1beta/models/{model}:{method}`        | `x-goog-api-key`   |
//! | Vertex AI | `{endpoint}/models/{model}:{method}`               | `Bearer` token     |
//!
//! Embeddings use `:embedContent` on the Gemini API and `:predict` on Vertex AI.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::services::gemini_service::GeminiService;
//! use ai_llm_service::{LlmModelConfig, LlmProvider, SafetySetting};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = GeminiService::new(LlmModelConfig {
//!     provider: LlmProvider::Gemini,
//!     model: "gemini-2.0-flash".into(),
//!     endpoint: "https://generativelanguage.googleapis.com".into(),
//!     api_key: Some("AIza...".into()),
//!     max_tokens: Some(1024),
//!     temperature: Some(0.7),
//!     top_p: None,
//!     timeout_secs: Some(60),
//!     safety: SafetySetting::block_medium_and_above(),
//! })?;
//!
//! let text = svc.generate("How do I report an unplowed road?", Some("Be brief.")).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    config::{
        embed_task::EmbedTask, llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
        safety::SafetySetting,
    },
    error_handler::{AiLlmError, ProviderError, ProviderErrorKind},
    services::{base_endpoint, http_client, read_json},
};

/// Thin client for one Google model profile.
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embed: String,
    url_count_tokens: String,
}

impl GeminiService {
    /// Creates a client for a Gemini API or Vertex AI profile.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] for non-Google profiles
    /// - [`ProviderErrorKind::InvalidEndpoint`] for a non-http(s) endpoint
    /// - [`ProviderErrorKind::MissingApiKey`] without a key/token
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if !cfg.provider.is_google() {
            return Err(ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into());
        }

        let headers = auth_headers(&cfg)?;
        let client = http_client(&cfg, headers)?;

        let embed_method = match cfg.provider {
            LlmProvider::VertexAi => "predict",
            _ => "embedContent",
        };

        Ok(Self {
            url_generate: model_url(&cfg, "generateContent")?,
            url_embed: model_url(&cfg, embed_method)?,
            url_count_tokens: model_url(&cfg, "countTokens")?,
            client,
            cfg,
        })
    }

    /// Active profile.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Single-turn `generateContent` call.
    ///
    /// A response without candidate text (for example blocked by safety
    /// filters) yields `Ok("")` so callers can treat it as an empty answer.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies.
    #[instrument(skip_all, fields(provider = ?self.cfg.provider, model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt, system);

        debug!("POST {}", self.url_generate);
        let resp = self.client.post(&self.url_generate).json(&body).send().await?;
        let out: GenerateContentResponse =
            read_json(self.cfg.provider, &self.url_generate, resp).await?;

        match extract_text(&out) {
            Some(text) => Ok(text),
            None => {
                warn!(
                    block_reason = out.block_reason().unwrap_or("none"),
                    finish_reason = out.finish_reason().unwrap_or("none"),
                    "model returned no text"
                );
                Ok(String::new())
            }
        }
    }

    /// Embeds `input` for the given retrieval task.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses, or a body without a vector.
    #[instrument(skip_all, fields(provider = ?self.cfg.provider, model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str, task: EmbedTask) -> Result<Vec<f32>, AiLlmError> {
        debug!("POST {}", self.url_embed);
        let values = match self.cfg.provider {
            LlmProvider::VertexAi => {
                let body = PredictRequest {
                    instances: vec![PredictInstance {
                        content: input,
                        task_type: task.as_google(),
                    }],
                };
                let resp = self.client.post(&self.url_embed).json(&body).send().await?;
                let out: PredictResponse = read_json(self.cfg.provider, &self.url_embed, resp).await?;
                out.predictions
                    .into_iter()
                    .next()
                    .map(|p| p.embeddings.values)
            }
            _ => {
                let body = EmbedContentRequest {
                    content: Content::user(input),
                    task_type: task.as_google(),
                };
                let resp = self.client.post(&self.url_embed).json(&body).send().await?;
                let out: EmbedContentResponse =
                    read_json(self.cfg.provider, &self.url_embed, resp).await?;
                Some(out.embedding.values)
            }
        };

        match values {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::Decode("response contained no embedding values".into()),
            )
            .into()),
        }
    }

    /// Counts prompt tokens; a cheap authenticated call used for health probes.
    pub async fn count_tokens(&self, text: &str) -> Result<u64, AiLlmError> {
        let body = CountTokensRequest {
            contents: vec![Content::user(text)],
        };
        let resp = self
            .client
            .post(&self.url_count_tokens)
            .json(&body)
            .send()
            .await?;
        let out: CountTokensResponse =
            read_json(self.cfg.provider, &self.url_count_tokens, resp).await?;
        Ok(out.total_tokens)
    }
}

/// `{base}/…/models/{model}:{method}` for the profile's provider.
pub(crate) fn model_url(cfg: &LlmModelConfig, method: &str) -> Result<String, AiLlmError> {
    let base = base_endpoint(cfg)?;
    Ok(match cfg.provider {
        LlmProvider::VertexAi => format!("{base}/models/{}:{method}", cfg.model),
        _ => format!("{base}/v1beta/models/{}:{method}", cfg.model),
    })
}

/// Authentication headers for the profile, marked sensitive so they never reach logs.
pub(crate) fn auth_headers(cfg: &LlmModelConfig) -> Result<HeaderMap, AiLlmError> {
    let key = cfg
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey))?;

    let (name, raw) = match cfg.provider {
        LlmProvider::VertexAi => (AUTHORIZATION, format!("Bearer {key}")),
        _ => (HeaderName::from_static("x-goog-api-key"), key.to_string()),
    };

    let mut value = HeaderValue::from_str(&raw).map_err(|e| {
        ProviderError::new(
            cfg.provider,
            ProviderErrorKind::Decode(format!("invalid credential header: {e}")),
        )
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(name, value);
    Ok(headers)
}

/// Concatenated text parts of the first candidate, if any are non-empty.
fn extract_text(resp: &GenerateContentResponse) -> Option<String> {
    let content = resp.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    (!text.is_empty()).then_some(text)
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text }],
        }
    }

    fn system(text: &'a str) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

/// Request body for `:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    safety_settings: &'a [SafetySetting],
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            system_instruction: system.map(Content::system),
            safety_settings: &cfg.safety,
            generation_config: GenerationConfig {
                temperature: cfg.temperature,
                max_output_tokens: cfg.max_tokens,
                top_p: cfg.top_p,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Response body for `:generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

/// Gemini API `:embedContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
    task_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

/// Vertex AI `:predict` for text-embedding models.
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    content: &'a str,
    task_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    embeddings: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
struct CountTokensRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountTokensResponse {
    #[serde(default)]
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cfg(provider: LlmProvider, endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "gemini-2.0-flash".into(),
            endpoint: endpoint.into(),
            api_key: Some("secret".into()),
            max_tokens: Some(1024),
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(60),
            safety: SafetySetting::block_medium_and_above(),
        }
    }

    #[test]
    fn urls_per_provider() {
        let g = cfg(LlmProvider::Gemini, "https://generativelanguage.googleapis.com/");
        assert_eq!(
            model_url(&g, "generateContent").unwrap(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );

        let v = cfg(
            LlmProvider::VertexAi,
            "https://us-central1-aiplatform.googleapis.com/v1/projects/p/locations/us-central1/publishers/google",
        );
        assert_eq!(
            model_url(&v, "predict").unwrap(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/p/locations/us-central1/publishers/google/models/gemini-2.0-flash:predict"
        );
    }

    #[test]
    fn auth_header_per_provider() {
        let g = auth_headers(&cfg(LlmProvider::Gemini, "https://x")).unwrap();
        assert_eq!(g.get("x-goog-api-key").unwrap(), "secret");
        assert!(g.get("x-goog-api-key").unwrap().is_sensitive());

        let v = auth_headers(&cfg(LlmProvider::VertexAi, "https://x")).unwrap();
        assert_eq!(v.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[test]
    fn missing_key_and_wrong_provider() {
        let mut c = cfg(LlmProvider::Gemini, "https://x");
        c.api_key = None;
        assert!(matches!(
            GeminiService::new(c),
            Err(AiLlmError::Provider(ProviderError { kind: ProviderErrorKind::MissingApiKey, .. }))
        ));

        let o = cfg(LlmProvider::Ollama, "http://localhost:11434");
        assert!(matches!(
            GeminiService::new(o),
            Err(AiLlmError::Provider(ProviderError { kind: ProviderErrorKind::InvalidProvider, .. }))
        ));
    }

    #[test]
    fn request_body_shape() {
        let c = cfg(LlmProvider::Gemini, "https://x");
        let body = GenerateContentRequest::from_cfg(&c, "USER QUESTION: hi", Some("rules"));
        let v = serde_json::to_value(&body).unwrap();

        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "USER QUESTION: hi");
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "rules");
        assert!(v["systemInstruction"].get("role").is_none());
        assert_eq!(v["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 1024);
        let t = v["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((t - 0.7).abs() < 1e-6);
        assert!(v["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn request_without_system_or_safety() {
        let mut c = cfg(LlmProvider::Gemini, "https://x");
        c.safety.clear();
        let v = serde_json::to_value(GenerateContentRequest::from_cfg(&c, "q", None)).unwrap();
        assert!(v.get("systemInstruction").is_none());
        assert!(v.get("safetySettings").is_none());
    }

    #[test]
    fn text_extraction() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Call "}, {"text": "511."}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&resp).as_deref(), Some("Call 511."));
        assert_eq!(resp.finish_reason(), Some("STOP"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert_eq!(extract_text(&resp), None);
        assert_eq!(resp.block_reason(), Some("SAFETY"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(extract_text(&empty), None);
    }

    #[test]
    fn embedding_bodies() {
        let gem = serde_json::to_value(EmbedContentRequest {
            content: Content::user("snow"),
            task_type: EmbedTask::Query.as_google(),
        })
        .unwrap();
        assert_eq!(gem["content"]["parts"][0]["text"], "snow");
        assert_eq!(gem["taskType"], "RETRIEVAL_QUERY");

        let vtx = serde_json::to_value(PredictRequest {
            instances: vec![PredictInstance {
                content: "snow",
                task_type: EmbedTask::Document.as_google(),
            }],
        })
        .unwrap();
        assert_eq!(vtx["instances"][0]["task_type"], "RETRIEVAL_DOCUMENT");

        let out: PredictResponse = serde_json::from_value(json!({
            "predictions": [{"embeddings": {"values": [0.1, 0.2], "statistics": {"token_count": 1}}}]
        }))
        .unwrap();
        assert_eq!(out.predictions[0].embeddings.values.len(), 2);
    }
}
