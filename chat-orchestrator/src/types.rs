//! Values flowing through one request.

use guardrails::RejectionKind;
use serde::{Deserialize, Serialize};

/// A retrieved FAQ entry used to ground generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub question: String,
    pub answer: String,
}

impl ContextSnippet {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Outcome of one request, returned to the caller and mirrored into the log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResult {
    /// Text shown to the user (answer, rejection message or safe replacement).
    pub response: String,
    /// `true` when either guard replaced the answer.
    pub filtered: bool,
    /// Number of snippets the answer was grounded on.
    pub sources: usize,
    /// Which guard rule fired, if any.
    pub filter_reason: Option<RejectionKind>,
}

impl ChatResult {
    pub(crate) fn answered(response: String, sources: usize) -> Self {
        Self {
            response,
            filtered: false,
            sources,
            filter_reason: None,
        }
    }

    pub(crate) fn rejected(response: String, reason: Option<RejectionKind>) -> Self {
        Self {
            response,
            filtered: true,
            sources: 0,
            filter_reason: reason,
        }
    }
}

/// Request lifecycle, in order. Each transition is traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    InputChecked,
    Retrieved,
    Generated,
    OutputChecked,
    Logged,
    Responded,
}
