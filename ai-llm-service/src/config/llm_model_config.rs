use crate::config::{llm_provider::LlmProvider, safety::SafetySetting};

/// Configuration for one model profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: backend (Gemini, Vertex AI, Ollama).
/// - `model`: model identifier (e.g. `"gemini-2.0-flash"`, `"text-embedding-005"`).
/// - `endpoint`: base URL. For Vertex AI this already includes the
///   `projects/../locations/../publishers/google` path.
/// - `api_key`: API key (Gemini) or OAuth access token (Vertex AI).
/// - `max_tokens`: maximum number of output tokens.
/// - `temperature`: sampling temperature.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: per-request timeout.
/// - `safety`: content-safety thresholds (ignored by Ollama).
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider, SafetySetting};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-2.0-flash".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("AIza...".to_string()),
///     max_tokens: Some(1024),
///     temperature: Some(0.7),
///     top_p: None,
///     timeout_secs: Some(60),
///     safety: SafetySetting::block_medium_and_above(),
/// };
/// assert!(cfg.provider.is_google());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub safety: Vec<SafetySetting>,
}
