//! Strict JSONL reader for FAQ rows.

use std::io::{BufRead, BufReader};
use std::{fs::File, path::Path};

use tracing::{debug, info};

use crate::errors::RagError;
use crate::record::FaqRecord;

/// Reads `{question, answer, id?, embedding?}` rows.
///
/// - Empty lines are skipped.
/// - The first malformed row aborts with its 1-based line number.
///
/// # Errors
/// - [`RagError::Io`] if the file cannot be read.
/// - [`RagError::Parse`] if any line fails strict deserialization.
pub fn read_faq_records(jsonl_path: impl AsRef<Path>) -> Result<Vec<FaqRecord>, RagError> {
    info!(path = ?jsonl_path.as_ref(), "reading FAQ JSONL");

    let file = File::open(jsonl_path.as_ref())?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let rec: FaqRecord = serde_json::from_str(&line).map_err(|source| RagError::Parse {
            line: i + 1,
            source,
        })?;
        out.push(rec);
    }

    debug!(count = out.len(), "loaded FAQ records");
    Ok(out)
}
