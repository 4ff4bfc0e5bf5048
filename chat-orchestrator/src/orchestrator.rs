//! The request pipeline: validate → retrieve → generate → validate → log.

use std::sync::Arc;

use guardrails::Guardrails;
use tracing::{debug, error, info, warn};

use crate::{
    cfg::OrchestratorConfig,
    generator::Generator,
    log_sink::{InteractionLog, InteractionLogEntry, Severity, context_excerpt},
    retriever::Retriever,
    types::{ChatResult, ContextSnippet, PipelineStage},
};

/// Substituted when the generator fails.
pub const GENERATION_APOLOGY: &str =
    "I apologize, but I encountered an error. Please try again later.";

/// Returned for failures caught at the request boundary.
pub const GENERIC_FAILURE: &str = "I apologize, but an error occurred. Please try again.";

/// Query recorded when a failed request carried no readable question.
const UNKNOWN_QUERY: &str = "unknown";

/// Runs one independent pipeline per request over shared collaborators.
pub struct ChatOrchestrator {
    guard: Guardrails,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    log: Arc<dyn InteractionLog>,
    cfg: OrchestratorConfig,
}

impl ChatOrchestrator {
    pub fn new(
        guard: Guardrails,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        log: Arc<dyn InteractionLog>,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self {
            guard,
            retriever,
            generator,
            log,
            cfg,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.cfg
    }

    /// Answers one user message. Never fails: collaborator errors are
    /// absorbed and guard rejections become the response text.
    pub async fn handle(&self, message: &str) -> ChatResult {
        let query = message.trim();
        stage(PipelineStage::Received);

        let checked = self.guard.check_input(query);
        stage(PipelineStage::InputChecked);
        if let Err(rejection) = checked {
            info!(reason = rejection.kind.code(), "input rejected");
            let result = ChatResult::rejected(rejection.message, Some(rejection.kind));
            self.record(query, &result.response, String::new(), true, Severity::Info)
                .await;
            stage(PipelineStage::Responded);
            return result;
        }

        let context = self.retrieve(query).await;
        stage(PipelineStage::Retrieved);

        let answer = self.generate(query, &context).await;
        stage(PipelineStage::Generated);

        let result = match self.guard.check_response(Some(answer.as_str())) {
            Ok(text) => ChatResult::answered(text.to_string(), context.len()),
            Err(rejection) => {
                warn!(reason = rejection.kind.code(), "response replaced by output guard");
                ChatResult::rejected(rejection.message, Some(rejection.kind))
            }
        };
        stage(PipelineStage::OutputChecked);

        let severity = if result.filtered {
            Severity::Warning
        } else {
            Severity::Info
        };
        let context_used = context_excerpt(&context, self.cfg.context_log_chars);
        self.record(query, &result.response, context_used, result.filtered, severity)
            .await;

        stage(PipelineStage::Responded);
        result
    }

    /// Records a failure caught outside [`Self::handle`] (bad request body,
    /// panic) and returns the generic response.
    pub async fn record_failure(&self, query: Option<&str>) -> ChatResult {
        let query = query.map(str::trim).unwrap_or(UNKNOWN_QUERY);
        error!(user_query = %query, "request failed");

        let result = ChatResult::rejected(GENERIC_FAILURE.to_string(), None);
        self.record(query, &result.response, String::new(), true, Severity::Error)
            .await;
        result
    }

    async fn retrieve(&self, query: &str) -> Vec<ContextSnippet> {
        match self.retriever.search(query, self.cfg.top_k).await {
            Ok(snippets) => snippets,
            Err(e) => {
                warn!(error = %e, "retrieval failed; continuing without context");
                Vec::new()
            }
        }
    }

    async fn generate(&self, query: &str, context: &[ContextSnippet]) -> String {
        match self.generator.generate(query, context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "generation failed; substituting apology");
                GENERATION_APOLOGY.to_string()
            }
        }
    }

    async fn record(
        &self,
        query: &str,
        response: &str,
        context_used: String,
        filtered: bool,
        severity: Severity,
    ) {
        let entry = InteractionLogEntry::new(query, response, context_used, filtered, severity);
        if let Err(e) = self.log.append(&entry).await {
            warn!(error = %e, "interaction log write failed");
        }
        stage(PipelineStage::Logged);
    }
}

fn stage(s: PipelineStage) {
    debug!(stage = ?s, "pipeline transition");
}
