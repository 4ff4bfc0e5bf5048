//! Loads FAQ rows from a JSONL or CSV file into the Qdrant collection.
//!
//! ```bash
//! provision-faqs data/ads_faqs.jsonl [--verbose]
//! provision-faqs alaska-dept-of-snow-faqs.csv
//! ```
//!
//! JSONL rows are `{"question": .., "answer": .., "id"?: .., "embedding"?: [..]}`;
//! CSV files carry a `question,answer` header row.
//! Rows without an embedding are embedded with the configured embedding profile.

use std::{path::PathBuf, sync::Arc, time::Instant};

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use rag_store::{FaqStore, LlmEmbedder, RagConfig};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load FAQ rows into the Qdrant collection
#[derive(Parser, Debug)]
#[command(
    name = "provision-faqs",
    version,
    about = "Embed FAQ rows (JSONL or question,answer CSV) and upsert them into Qdrant"
)]
struct Args {
    /// FAQ file; `.csv` is read as CSV with a header row, anything else as JSONL
    path: PathBuf,

    /// Debug logging for the workspace crates
    #[arg(short, long)]
    verbose: bool,
}

/// A `.env` error worth reporting; a missing file is not one.
fn dotenv_problem<T>(res: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    res.err().filter(|e| !e.not_found())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", level))
        .with(telemetry::layer())
        .try_init()?;

    if let Some(e) = dotenv_problem(dotenv) {
        warn!(error = %e, ".env could not be loaded");
    }

    let llm = Arc::new(LlmServiceProfiles::from_env().context("LLM configuration")?);
    let cfg = RagConfig::from_env().context("Qdrant configuration")?;
    let embedder = LlmEmbedder::new(llm.clone(), cfg.embedding_dim);
    let store = FaqStore::new(cfg).context("Qdrant client")?;

    let (_, embedding) = llm.profiles();
    info!(
        path = %args.path.display(),
        collection = %store.config().collection,
        embedding_model = %embedding.model,
        "provisioning FAQs"
    );

    let started = Instant::now();
    let written = store
        .ingest_file(&args.path, &embedder)
        .await
        .with_context(|| format!("provision {}", args.path.display()))?;

    println!(
        "{} {} FAQ entries into {} in {:.1}s",
        "Provisioned".green().bold(),
        written.to_string().bold(),
        store.config().collection.cyan(),
        started.elapsed().as_secs_f32()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn path_and_verbose_flag() {
        let a = Args::try_parse_from(["provision-faqs", "faqs.jsonl", "--verbose"]).unwrap();
        assert_eq!(a.path, PathBuf::from("faqs.jsonl"));
        assert!(a.verbose);

        let a = Args::try_parse_from(["provision-faqs", "-v", "faqs.csv"]).unwrap();
        assert!(a.verbose);

        let a = Args::try_parse_from(["provision-faqs", "faqs.jsonl"]).unwrap();
        assert!(!a.verbose);
    }

    #[test]
    fn rejects_missing_path_and_unknown_flags() {
        assert!(Args::try_parse_from(["provision-faqs"]).is_err());
        assert!(Args::try_parse_from(["provision-faqs", "--dry-run", "faqs.jsonl"]).is_err());
        assert!(Args::try_parse_from(["provision-faqs", "a.jsonl", "b.jsonl"]).is_err());
    }

    #[test]
    fn missing_env_file_is_quiet_but_broken_one_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dotenv_problem(dotenvy::from_path(dir.path().join("absent.env"))).is_none());

        let broken = dir.path().join("broken.env");
        std::fs::write(&broken, "this is not an env line\n").unwrap();
        assert!(dotenv_problem(dotenvy::from_path(&broken)).is_some());
    }

    #[test]
    fn help_and_version_are_displayed_not_failed() {
        let help = Args::try_parse_from(["provision-faqs", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        let version = Args::try_parse_from(["provision-faqs", "-V"]).unwrap_err();
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
