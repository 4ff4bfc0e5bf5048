use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Backend used for generation and embeddings.
///
/// `Gemini` and `VertexAi` share the same `generateContent` wire format and
/// differ only in URL layout and authentication.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "vertex".parse().unwrap();
/// assert_eq!(p, LlmProvider::VertexAi);
/// assert!(p.is_google());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Generative Language API (`x-goog-api-key`).
    Gemini,
    /// Vertex AI publisher models (OAuth bearer token).
    VertexAi,
    /// Local Ollama runtime.
    Ollama,
}

impl LlmProvider {
    /// `true` for the two Google-hosted variants.
    pub fn is_google(self) -> bool {
        matches!(self, LlmProvider::Gemini | LlmProvider::VertexAi)
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "vertex" | "vertexai" | "vertex_ai" => Ok(LlmProvider::VertexAi),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("Gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!(" vertex_ai ".parse::<LlmProvider>().unwrap(), LlmProvider::VertexAi);
        assert_eq!("OLLAMA".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert!(matches!(
            "chatgpt".parse::<LlmProvider>(),
            Err(ConfigError::UnsupportedProvider(p)) if p == "chatgpt"
        ));
    }
}
