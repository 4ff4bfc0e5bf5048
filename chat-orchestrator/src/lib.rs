//! Guarded RAG request pipeline for the ADS chatbot.
//!
//! [`ChatOrchestrator::handle`] runs, per request:
//! input guard → FAQ retrieval → grounded generation → output guard → interaction log.
//!
//! Retrieval, generation and logging sit behind the [`Retriever`],
//! [`Generator`] and [`InteractionLog`] traits so tests can swap them out.
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use chat_orchestrator::*;
//! # use guardrails::Guardrails;
//! # async fn demo(retriever: Arc<dyn Retriever>, generator: Arc<dyn Generator>) {
//! let orchestrator = ChatOrchestrator::new(
//!     Guardrails::default(),
//!     retriever,
//!     generator,
//!     Arc::new(TracingInteractionLog),
//!     OrchestratorConfig::default(),
//! );
//! let result = orchestrator.handle("How do I report an unplowed road?").await;
//! println!("{} (filtered={})", result.response, result.filtered);
//! # }
//! ```

mod cfg;
mod error;
mod generator;
mod log_sink;
mod orchestrator;
pub mod prompt;
mod retriever;
mod types;

use std::{future::Future, pin::Pin};

pub use cfg::OrchestratorConfig;
pub use error::PipelineError;
pub use generator::{Generator, GroundedGenerator};
pub use log_sink::{
    InteractionLog, InteractionLogEntry, JsonlInteractionLog, Severity, TeeInteractionLog,
    TracingInteractionLog, context_excerpt,
};
pub use orchestrator::{ChatOrchestrator, GENERATION_APOLOGY, GENERIC_FAILURE};
pub use retriever::{FaqRetriever, Retriever};
pub use types::{ChatResult, ContextSnippet, PipelineStage};

/// Boxed `Send` future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
