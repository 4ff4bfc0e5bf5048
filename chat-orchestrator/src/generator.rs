//! Generation seam and its grounded hosted-model implementation.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::debug;

use crate::{
    BoxFuture,
    error::PipelineError,
    prompt::{ADS_SYSTEM_POLICY, build_user_prompt},
    types::ContextSnippet,
};

/// Produces an answer for a question grounded on the given snippets.
pub trait Generator: Send + Sync {
    fn generate<'a>(
        &'a self,
        question: &'a str,
        context: &'a [ContextSnippet],
    ) -> BoxFuture<'a, Result<String, PipelineError>>;
}

/// [`Generator`] that sends the ADS policy as system instruction and the
/// FAQ context + question as the user turn to the chat profile.
pub struct GroundedGenerator {
    llm: Arc<LlmServiceProfiles>,
}

impl GroundedGenerator {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        Self { llm }
    }
}

impl Generator for GroundedGenerator {
    fn generate<'a>(
        &'a self,
        question: &'a str,
        context: &'a [ContextSnippet],
    ) -> BoxFuture<'a, Result<String, PipelineError>> {
        Box::pin(async move {
            let prompt = build_user_prompt(question, context);
            debug!(prompt_chars = prompt.chars().count(), snippets = context.len(), "generating");
            Ok(self.llm.generate(&prompt, Some(ADS_SYSTEM_POLICY)).await?)
        })
    }
}
