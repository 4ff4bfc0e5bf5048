//! CSV reader for the agency's `question,answer` FAQ export.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::errors::RagError;
use crate::record::FaqRecord;

/// Reads a CSV file whose first row is a header and whose first two columns
/// are the question and the answer, in that order. Header names are not
/// checked; extra columns are ignored.
///
/// # Errors
/// - [`RagError::Csv`] if the file cannot be read or a row is ragged.
/// - [`RagError::Config`] if the header has fewer than two columns.
pub fn read_faq_csv(csv_path: impl AsRef<Path>) -> Result<Vec<FaqRecord>, RagError> {
    info!(path = ?csv_path.as_ref(), "reading FAQ CSV");

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(csv_path.as_ref())?;

    if rdr.headers()?.len() < 2 {
        return Err(RagError::Config(
            "FAQ CSV needs at least two columns: question,answer".into(),
        ));
    }

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let (question, answer) = (&row[0], &row[1]);
        if question.is_empty() && answer.is_empty() {
            continue;
        }
        out.push(FaqRecord {
            id: None,
            question: question.to_string(),
            answer: answer.to_string(),
            embedding: None,
        });
    }

    debug!(count = out.len(), "loaded FAQ records");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_quoted_rows_after_header() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(f, "question,answer").unwrap();
        writeln!(f, r#""How do I report an unplowed road?","Call 511, or use the ADS portal.""#).unwrap();
        writeln!(f, r#"What is SnowLine?,"An app for ""live"" plow tracking.""#).unwrap();
        writeln!(f, ",").unwrap();

        let rows = read_faq_csv(f.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].question, "How do I report an unplowed road?");
        assert_eq!(rows[0].answer, "Call 511, or use the ADS portal.");
        assert_eq!(rows[1].answer, r#"An app for "live" plow tracking."#);
        assert!(rows.iter().all(|r| r.id.is_none() && r.embedding.is_none()));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "question,answer").unwrap();
        writeln!(f, "only a question").unwrap();

        assert!(matches!(read_faq_csv(f.path()), Err(RagError::Csv(_))));
    }

    #[test]
    fn single_column_header_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "question").unwrap();
        writeln!(f, "When do plows run?").unwrap();

        assert!(matches!(read_faq_csv(f.path()), Err(RagError::Config(_))));
    }
}
