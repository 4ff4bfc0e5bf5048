//! Guard policy: deny-lists and user-facing messages as data.
//!
//! The defaults reproduce the ADS policy. A replacement can be loaded from a
//! JSON file; any field omitted there keeps its default.
//!
//! ```json
//! {
//!   "max_input_chars": 800,
//!   "injection_phrases": ["ignore previous", "jailbreak"]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GuardError;

/// Default character limit for a question.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

const DEFAULT_INJECTION_PHRASES: &[&str] = &[
    "ignore previous",
    "ignore above",
    "disregard",
    "forget your instructions",
    "new instructions",
    "system prompt",
    "you are now",
    "act as",
    "pretend to be",
    "roleplay as",
];

const DEFAULT_DISCLOSURE_PHRASES: &[&str] = &[
    "system prompt",
    "my instructions",
    "i was told to",
    "my rules are",
];

/// Replacement messages returned to the caller on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardMessages {
    pub empty_input: String,
    /// `{limit}` is replaced with the configured character limit.
    pub input_too_long: String,
    pub off_topic_redirect: String,
    pub empty_response: String,
    pub disclosure_redirect: String,
}

impl Default for GuardMessages {
    fn default() -> Self {
        Self {
            empty_input: "Please enter a question.".into(),
            input_too_long: "Question is too long. Please keep it under {limit} characters.".into(),
            off_topic_redirect:
                "I can only answer questions about Alaska Department of Snow services.".into(),
            empty_response:
                "I apologize, but I couldn't generate a response. Please try again.".into(),
            disclosure_redirect:
                "I'm here to help with Alaska Department of Snow questions. How can I assist you?"
                    .into(),
        }
    }
}

/// Deny-lists, limits and messages used by [`crate::Guardrails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardPolicy {
    pub max_input_chars: usize,
    /// Phrases that mark a question as a prompt-injection attempt.
    pub injection_phrases: Vec<String>,
    /// Phrases that mark a response as leaking the system policy.
    pub disclosure_phrases: Vec<String>,
    pub messages: GuardMessages,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            injection_phrases: to_owned(DEFAULT_INJECTION_PHRASES),
            disclosure_phrases: to_owned(DEFAULT_DISCLOSURE_PHRASES),
            messages: GuardMessages::default(),
        }
    }
}

impl GuardPolicy {
    /// Loads a policy from a JSON file and validates it.
    ///
    /// # Errors
    /// - [`GuardError::Io`] if the file cannot be read
    /// - [`GuardError::Parse`] if it is not a valid policy document
    /// - [`GuardError::Invalid`] if validation fails
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GuardError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| GuardError::Io {
            path: display.clone(),
            source,
        })?;
        let policy: GuardPolicy =
            serde_json::from_str(&raw).map_err(|source| GuardError::Parse {
                path: display.clone(),
                source,
            })?;
        policy.validate()?;

        info!(
            path = %path.display(),
            injection_phrases = policy.injection_phrases.len(),
            disclosure_phrases = policy.disclosure_phrases.len(),
            "guard policy loaded"
        );
        Ok(policy)
    }

    /// Checks structural sanity of the policy.
    ///
    /// # Errors
    /// Returns [`GuardError::Invalid`] for a zero limit or blank phrases.
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.max_input_chars == 0 {
            return Err(GuardError::Invalid("max_input_chars must be > 0"));
        }
        if self.injection_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(GuardError::Invalid("injection_phrases must not contain blanks"));
        }
        if self.disclosure_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(GuardError::Invalid("disclosure_phrases must not contain blanks"));
        }
        Ok(())
    }

    /// The too-long message with `{limit}` substituted.
    pub fn too_long_message(&self) -> String {
        self.messages
            .input_too_long
            .replace("{limit}", &self.max_input_chars.to_string())
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.injection_phrases = normalize(self.injection_phrases);
        self.disclosure_phrases = normalize(self.disclosure_phrases);
        self
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn normalize(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
