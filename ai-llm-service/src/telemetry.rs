//! Shared `tracing` formatting for every binary in the workspace.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets rendered by [`layer`]: the workspace crates plus the
/// `interaction` audit target.
pub const TARGET_PREFIXES: &[&str] = &[
    "ads_chatbot",
    "provision_faqs",
    "api",
    "ai_llm_service",
    "rag_store",
    "guardrails",
    "chat_orchestrator",
    "interaction",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

fn is_workspace_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// Formatting layer that renders only events emitted by workspace crates.
///
/// - RFC3339 UTC timestamps, compact single-line format
/// - `file:line` and target
/// - span close events (durations of `#[instrument]`ed calls)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(
            fmt::format()
                .compact()
                .with_timer(ChronoRfc3339Utc)
                .with_level(true)
                .with_target(true)
                .with_source_location(true),
        )
        .with_filter(only_workspace)
}

/// Level directive for one target, e.g. `rag_store=debug`.
///
/// Returns `None` if `target` is not a valid directive name.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// `RUST_LOG` if set, otherwise `default`, with `level` applied to every
/// workspace target.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    TARGET_PREFIXES
        .iter()
        .filter_map(|t| level_directive(t, level))
        .fold(base, |f, d| f.add_directive(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_workspace_targets_only() {
        assert!(is_workspace_target("rag_store::retrieve"));
        assert!(is_workspace_target("interaction"));
        assert!(!is_workspace_target("hyper::proto"));
        assert!(!is_workspace_target("h2"));
    }

    #[test]
    fn builds_directive() {
        let d = level_directive("guardrails", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "guardrails=debug");
    }
}
