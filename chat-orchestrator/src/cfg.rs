//! Runtime configuration loaded from environment variables.

/// Knobs for the request pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Number of FAQ snippets requested per question (`RAG_TOP_K`, default 3).
    pub top_k: usize,
    /// Prefix of the serialized context kept in the interaction log
    /// (`CONTEXT_LOG_CHARS`, default 500).
    pub context_log_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            context_log_chars: 500,
        }
    }
}

impl OrchestratorConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    /// Unparsable or zero values fall back to the defaults.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            top_k: parse(lookup, "RAG_TOP_K", d.top_k),
            context_log_chars: parse(lookup, "CONTEXT_LOG_CHARS", d.context_log_chars),
        }
    }
}

fn parse(lookup: &dyn Fn(&str) -> Option<String>, k: &str, dflt: usize) -> usize {
    lookup(k)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides() {
        let cfg = OrchestratorConfig::from_lookup(&|k| match k {
            "RAG_TOP_K" => Some("5".into()),
            "CONTEXT_LOG_CHARS" => Some("zero".into()),
            _ => None,
        });
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.context_log_chars, 500);

        let zero = OrchestratorConfig::from_lookup(&|k| (k == "RAG_TOP_K").then(|| "0".into()));
        assert_eq!(zero.top_k, 3);
    }
}
