//! Rejection verdicts and policy-loading errors.

use thiserror::Error;

/// Why a piece of text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    /// Question was empty or whitespace only.
    EmptyInput,
    /// Question exceeded the character limit.
    InputTooLong { chars: usize, limit: usize },
    /// Question contained a deny-listed injection phrase.
    InjectionPhrase(String),
    /// Model produced no text.
    EmptyResponse,
    /// Response contained a deny-listed self-disclosure phrase.
    DisclosurePhrase(String),
}

impl RejectionKind {
    /// Stable short code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            RejectionKind::EmptyInput => "EMPTY_INPUT",
            RejectionKind::InputTooLong { .. } => "INPUT_TOO_LONG",
            RejectionKind::InjectionPhrase(_) => "INJECTION_PHRASE",
            RejectionKind::EmptyResponse => "EMPTY_RESPONSE",
            RejectionKind::DisclosurePhrase(_) => "DISCLOSURE_PHRASE",
        }
    }

    /// `true` for verdicts produced by the input guard.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            RejectionKind::EmptyInput
                | RejectionKind::InputTooLong { .. }
                | RejectionKind::InjectionPhrase(_)
        )
    }
}

/// A rejected verdict carrying the user-facing replacement message.
///
/// `Display` renders only the message, which is safe to return to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
}

impl Rejection {
    pub(crate) fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors raised while loading or validating a [`crate::GuardPolicy`].
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("[Guardrails] failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[Guardrails] failed to parse policy file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("[Guardrails] invalid policy: {0}")]
    Invalid(&'static str),
}
