//! Provisioning pipeline: read FAQ JSONL or CSV → resolve vectors → upsert into Qdrant.
//!
//! Each FAQ becomes one point with payload `{question, answer, content}`;
//! `content` is the text that was embedded.

use std::collections::HashMap;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{PointStruct, Value as QValue, value};
use tracing::{debug, info};

use crate::config::{RagConfig, VectorSpace};
use crate::embed::{EmbedTask, EmbeddingsProvider};
use crate::errors::RagError;
use crate::io_csv::read_faq_csv;
use crate::io_jsonl::read_faq_records;
use crate::qdrant_facade::QdrantFacade;
use crate::record::FaqRecord;

/// Reads FAQ rows, choosing the format by extension: `.csv` (any case) is
/// CSV with a header row, everything else is JSONL.
///
/// # Errors
/// Whatever the chosen reader reports.
pub fn read_faq_file(path: impl AsRef<Path>) -> Result<Vec<FaqRecord>, RagError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_faq_csv(path)
    } else {
        read_faq_records(path)
    }
}

/// Ingests one FAQ file (JSONL or CSV) and returns the number of points written.
///
/// # Errors
/// I/O, parse, embedding, vector size mismatch or Qdrant failures.
pub async fn ingest_file(
    cfg: &RagConfig,
    faq_path: impl AsRef<Path>,
    provider: &dyn EmbeddingsProvider,
    client: &QdrantFacade,
) -> Result<usize, RagError> {
    let records = read_faq_file(&faq_path)?;
    if records.is_empty() {
        info!(path = ?faq_path.as_ref(), "no FAQ records found");
        return Ok(0);
    }

    let vector_size = determine_vector_size(&records, provider, cfg.embedding_dim).await?;
    debug!(vector_size, "vector size determined");

    client
        .ensure_collection(&VectorSpace {
            size: vector_size,
            distance: cfg.distance,
        })
        .await?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"),
    );

    let mut total = 0usize;
    for chunk in records.chunks(cfg.upsert_batch.max(1)) {
        let points = build_points(chunk, vector_size, provider).await?;
        total += client.upsert_points(points).await?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("provisioning complete");
    info!(total, collection = client.collection(), "FAQ records ingested");
    Ok(total)
}

/// Embedding dimensionality: configured, else first precomputed vector,
/// else a probe embedding of the first record.
async fn determine_vector_size(
    records: &[FaqRecord],
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
) -> Result<usize, RagError> {
    let precomputed = records.iter().find_map(|r| r.embedding.as_ref());

    if let Some(dim) = expected_dim {
        if let Some(v) = precomputed {
            if v.len() != dim {
                return Err(RagError::VectorSizeMismatch { got: v.len(), want: dim });
            }
        }
        return Ok(dim);
    }

    if let Some(v) = precomputed {
        return Ok(v.len());
    }

    match records.first() {
        Some(first) => Ok(provider
            .embed(&first.content(), EmbedTask::Document)
            .await?
            .len()),
        None => Err(RagError::Config("cannot infer vector size without records".into())),
    }
}

/// Builds points for a batch, embedding records without a precomputed vector.
async fn build_points(
    chunk: &[FaqRecord],
    vector_size: usize,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<PointStruct>, RagError> {
    let mut pts = Vec::with_capacity(chunk.len());

    for r in chunk {
        let vector = match &r.embedding {
            Some(v) => v.clone(),
            None => provider.embed(&r.content(), EmbedTask::Document).await?,
        };
        if vector.len() != vector_size {
            return Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want: vector_size,
            });
        }
        pts.push(faq_point(r, vector));
    }

    Ok(pts)
}

/// Converts one FAQ into a Qdrant point.
fn faq_point(r: &FaqRecord, vector: Vec<f32>) -> PointStruct {
    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert("question".into(), qstring(&r.question));
    payload.insert("answer".into(), qstring(&r.answer));
    payload.insert("content".into(), qstring(&r.content()));

    PointStruct {
        id: Some(r.point_id().to_string().into()),
        payload,
        vectors: Some(vector.into()),
        ..Default::default()
    }
}

/// Wraps a string into Qdrant `Value`.
fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        pin::Pin,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use qdrant_client::qdrant::PointId;

    use super::*;

    struct FixedEmbedder {
        dim: usize,
        calls: AtomicUsize,
    }

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
            task: EmbedTask,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
            Box::pin(async move {
                assert_eq!(task, EmbedTask::Document);
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![0.5; self.dim])
            })
        }
    }

    fn faq(q: &str, embedding: Option<Vec<f32>>) -> FaqRecord {
        FaqRecord {
            id: None,
            question: q.into(),
            answer: "Check the ADS road map.".into(),
            embedding,
        }
    }

    #[test]
    fn format_follows_extension() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("faqs.CSV");
        let mut f = std::fs::File::create(&csv_path).unwrap();
        writeln!(f, "question,answer\nWhen do plows run?,Around the clock.").unwrap();

        let jsonl_path = dir.path().join("faqs.jsonl");
        let mut f = std::fs::File::create(&jsonl_path).unwrap();
        writeln!(f, r#"{{"question":"When do plows run?","answer":"Around the clock."}}"#).unwrap();

        let from_csv = read_faq_file(&csv_path).unwrap();
        let from_jsonl = read_faq_file(&jsonl_path).unwrap();
        assert_eq!(from_csv, from_jsonl);
        assert_eq!(from_csv[0].point_id(), from_jsonl[0].point_id());
    }

    #[test]
    fn point_payload_and_id() {
        let r = faq("Where are plows now?", None);
        let p = faq_point(&r, vec![0.0; 4]);

        assert_eq!(p.id, Some(PointId::from(r.point_id().to_string())));
        let text = |k: &str| match &p.payload[k].kind {
            Some(value::Kind::StringValue(s)) => s.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(text("question"), "Where are plows now?");
        assert_eq!(text("answer"), "Check the ADS road map.");
        assert_eq!(text("content"), r.content());
    }

    #[tokio::test]
    async fn vector_size_resolution() {
        let e = FixedEmbedder { dim: 8, calls: AtomicUsize::new(0) };

        let pre = [faq("a", Some(vec![0.0; 3]))];
        assert_eq!(determine_vector_size(&pre, &e, None).await.unwrap(), 3);
        assert!(matches!(
            determine_vector_size(&pre, &e, Some(4)).await,
            Err(RagError::VectorSizeMismatch { got: 3, want: 4 })
        ));

        let bare = [faq("a", None)];
        assert_eq!(determine_vector_size(&bare, &e, None).await.unwrap(), 8);
        assert_eq!(e.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn build_points_embeds_only_missing_vectors() {
        let e = FixedEmbedder { dim: 3, calls: AtomicUsize::new(0) };
        let chunk = [faq("a", Some(vec![1.0; 3])), faq("b", None)];

        let pts = build_points(&chunk, 3, &e).await.unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(e.calls.load(Ordering::SeqCst), 1);

        let wrong = [faq("c", Some(vec![1.0; 2]))];
        assert!(matches!(
            build_points(&wrong, 3, &e).await,
            Err(RagError::VectorSizeMismatch { got: 2, want: 3 })
        ));
    }
}
