//! Interaction log: one structured record per request, filtered ones included.
//!
//! Sinks:
//! - [`TracingInteractionLog`]: `tracing` event on target `interaction`
//! - [`JsonlInteractionLog`]: one JSON object per line in a local file
//! - [`TeeInteractionLog`]: fan-out to several sinks

use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};
use tracing::{error, info, warn};

use crate::{BoxFuture, error::PipelineError, types::ContextSnippet};

/// Log severity of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Answered or input-rejected.
    Info,
    /// Output replaced by the output guard.
    Warning,
    /// Unhandled failure at the boundary.
    Error,
}

/// One append-only interaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    /// RFC 3339 UTC.
    pub timestamp: String,
    pub user_query: String,
    pub response: String,
    /// Prefix of the JSON-serialized snippets, empty when none were used.
    pub context_used: String,
    pub was_filtered: bool,
    pub severity: Severity,
}

impl InteractionLogEntry {
    pub fn new(
        user_query: impl Into<String>,
        response: impl Into<String>,
        context_used: impl Into<String>,
        was_filtered: bool,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            user_query: user_query.into(),
            response: response.into(),
            context_used: context_used.into(),
            was_filtered,
            severity,
        }
    }
}

/// First `max_chars` characters of the snippets serialized as a JSON array.
pub fn context_excerpt(snippets: &[ContextSnippet], max_chars: usize) -> String {
    if snippets.is_empty() {
        return String::new();
    }
    serde_json::to_string(snippets)
        .map(|s| s.chars().take(max_chars).collect())
        .unwrap_or_default()
}

/// Destination for interaction records.
pub trait InteractionLog: Send + Sync {
    fn append<'a>(&'a self, entry: &'a InteractionLogEntry)
    -> BoxFuture<'a, Result<(), PipelineError>>;
}

/// Emits each record as a structured `tracing` event; level follows severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInteractionLog;

impl InteractionLog for TracingInteractionLog {
    fn append<'a>(
        &'a self,
        e: &'a InteractionLogEntry,
    ) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            match e.severity {
                Severity::Info => info!(
                    target: "interaction",
                    timestamp = %e.timestamp,
                    user_query = %e.user_query,
                    response = %e.response,
                    context_used = %e.context_used,
                    was_filtered = e.was_filtered,
                    "interaction"
                ),
                Severity::Warning => warn!(
                    target: "interaction",
                    timestamp = %e.timestamp,
                    user_query = %e.user_query,
                    response = %e.response,
                    context_used = %e.context_used,
                    was_filtered = e.was_filtered,
                    "interaction"
                ),
                Severity::Error => error!(
                    target: "interaction",
                    timestamp = %e.timestamp,
                    user_query = %e.user_query,
                    response = %e.response,
                    context_used = %e.context_used,
                    was_filtered = e.was_filtered,
                    "interaction"
                ),
            }
            Ok(())
        })
    }
}

/// Appends one JSON object per line. Writes are serialized by a mutex so
/// concurrent requests never interleave lines.
pub struct JsonlInteractionLog {
    file: Mutex<tokio::fs::File>,
}

impl JsonlInteractionLog {
    /// Opens (or creates) `path` in append mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl InteractionLog for JsonlInteractionLog {
    fn append<'a>(
        &'a self,
        entry: &'a InteractionLogEntry,
    ) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            let mut line = serde_json::to_string(entry)?;
            line.push('\n');

            let mut file = self.file.lock().await;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
            Ok(())
        })
    }
}

/// Writes to every sink; returns the first failure after trying all of them.
pub struct TeeInteractionLog {
    sinks: Vec<Arc<dyn InteractionLog>>,
}

impl TeeInteractionLog {
    pub fn new(sinks: Vec<Arc<dyn InteractionLog>>) -> Self {
        Self { sinks }
    }
}

impl InteractionLog for TeeInteractionLog {
    fn append<'a>(
        &'a self,
        entry: &'a InteractionLogEntry,
    ) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            let mut first_err = None;
            for sink in &self.sinks {
                if let Err(e) = sink.append(entry).await {
                    first_err.get_or_insert(e);
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }
}
