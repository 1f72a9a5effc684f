// src/output/json.rs
use crate::batch::BatchOutcome;
use crate::report::ScoreReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct FailureView {
    pub document_id: String,
    pub error: String,
}

/// Whole-run JSON document.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub dictionary_size: usize,
    pub reports: &'a [ScoreReport],
    pub failures: Vec<FailureView>,
}

impl<'a> RunSummary<'a> {
    pub fn new(outcome: &'a BatchOutcome, dictionary_size: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            dictionary_size,
            reports: &outcome.reports,
            failures: outcome
                .failures
                .iter()
                .map(|f| FailureView {
                    document_id: f.document_id.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

pub fn write_json<W: Write>(writer: W, summary: &RunSummary<'_>) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

pub fn write_json_file(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating json output {}", path.display()))?;
    write_json(std::io::BufWriter::new(file), summary)
        .with_context(|| format!("writing json output {}", path.display()))?;
    tracing::info!(target: "output", path = %path.display(), "json written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchFailure;
    use crate::dictionary::{PhraseDictionary, PhraseEntry};
    use crate::error::ScoreError;
    use crate::scorer::DocumentScorer;

    #[test]
    fn summary_shape() {
        let d = PhraseDictionary::new(vec![PhraseEntry::new("cost", 0.0, 1.0).unwrap()]);
        let outcome = BatchOutcome {
            reports: vec![DocumentScorer::new().score_text("a.txt", "cost cost", &d)],
            failures: vec![BatchFailure {
                document_id: "b.txt".into(),
                error: ScoreError::DeadlineExceeded {
                    document_id: "b.txt".into(),
                },
            }],
        };
        let summary = RunSummary::new(&outcome, d.len());
        let mut buf = Vec::new();
        write_json(&mut buf, &summary).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(v["dictionary_size"], 1);
        let rep = &v["reports"][0];
        assert_eq!(rep["document_id"], "a.txt");
        assert_eq!(rep["exploit_score"], 2.0);
        assert_eq!(rep["ratio"], "undefined");
        assert_eq!(rep["phrase_counts"][0]["phrase"], "cost");
        assert_eq!(rep["phrase_counts"][0]["count"], 2);
        assert_eq!(v["failures"][0]["document_id"], "b.txt");
        assert!(v["generated_at"].is_string());
    }
}
