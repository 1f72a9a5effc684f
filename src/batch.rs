// src/batch.rs
//! Batch runner: score many documents concurrently, return them in input order.
//!
//! Flow per document:
//! 1) wait for a worker permit (bounded pool)
//! 2) give up if the batch deadline already passed (not-yet-started docs only)
//! 3) hand it to `DocumentScorer::score_document`: text is read on the async
//!    runtime, scoring runs on a blocking thread (CPU-bound)
//!
//! A failing document never affects its siblings; it lands in `failures`.

use crate::dictionary::PhraseDictionary;
use crate::error::ScoreError;
use crate::ingest::DocumentSource;
use crate::metrics::{
    ensure_metrics_described, BATCH_LAST_RUN_TS, DOCUMENTS_TOTAL, DOCUMENT_FAILURES_TOTAL,
};
use crate::report::ScoreReport;
use crate::scorer::DocumentScorer;
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Documents scored at once. 0 = available parallelism.
    pub document_workers: usize,
    /// Threads per document scan.
    pub phrase_workers: usize,
    /// Documents not started within this budget are skipped.
    pub timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            document_workers: 0,
            phrase_workers: 1,
            timeout: None,
        }
    }
}

impl BatchOptions {
    pub fn effective_document_workers(&self) -> usize {
        if self.document_workers > 0 {
            return self.document_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    pub document_id: String,
    pub error: ScoreError,
}

/// Reports for the documents that scored, failures for the rest; both in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<ScoreReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub async fn run(
        &self,
        documents: Vec<Box<dyn DocumentSource>>,
        dictionary: Arc<PhraseDictionary>,
    ) -> BatchOutcome {
        ensure_metrics_described();

        let started = Instant::now();
        let deadline = self.options.timeout.map(|t| started + t);
        let workers = self.options.effective_document_workers();
        let scorer = DocumentScorer::with_phrase_workers(self.options.phrase_workers);
        let permits = Arc::new(Semaphore::new(workers));

        let total = documents.len();
        let mut ids = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (position, document) in documents.into_iter().enumerate() {
            ids.push(document.id().to_string());
            let permits = Arc::clone(&permits);
            let dictionary = Arc::clone(&dictionary);
            tasks.spawn(async move {
                let outcome = score_one(document, dictionary, scorer, permits, deadline).await;
                (position, outcome)
            });
        }

        // Join barrier: collect in completion order, restore input order below.
        let mut slots: Vec<Option<Result<ScoreReport, ScoreError>>> =
            (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, outcome)) => slots[position] = Some(outcome),
                Err(e) => warn!(target: "batch", error = %e, "batch task failed to join"),
            }
        }

        let mut outcome = BatchOutcome::default();
        for (slot, document_id) in slots.into_iter().zip(ids) {
            let result = slot.unwrap_or_else(|| {
                Err(ScoreError::TaskAborted {
                    document_id: document_id.clone(),
                    reason: "task did not complete".into(),
                })
            });
            match result {
                Ok(report) => outcome.reports.push(report),
                Err(error) => {
                    warn!(target: "batch", document = %document_id, error = %error, "document failed");
                    outcome.failures.push(BatchFailure { document_id, error });
                }
            }
        }

        counter!(DOCUMENTS_TOTAL).increment(outcome.reports.len() as u64);
        counter!(DOCUMENT_FAILURES_TOTAL).increment(outcome.failures.len() as u64);
        gauge!(BATCH_LAST_RUN_TS).set(chrono::Utc::now().timestamp().max(0) as f64);

        info!(
            target: "batch",
            documents = total,
            scored = outcome.reports.len(),
            failed = outcome.failures.len(),
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        outcome
    }
}

async fn score_one(
    document: Box<dyn DocumentSource>,
    dictionary: Arc<PhraseDictionary>,
    scorer: DocumentScorer,
    permits: Arc<Semaphore>,
    deadline: Option<Instant>,
) -> Result<ScoreReport, ScoreError> {
    let document_id = document.id().to_string();
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| ScoreError::TaskAborted {
            document_id: document_id.clone(),
            reason: "worker pool closed".into(),
        })?;

    if deadline.is_some_and(|d| Instant::now() >= d) {
        return Err(ScoreError::DeadlineExceeded { document_id });
    }

    scorer.score_document(document.as_ref(), dictionary).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::PhraseEntry;
    use crate::error::DocumentReadError;
    use crate::ingest::InMemoryDocument;

    struct Unreadable(&'static str);

    #[async_trait::async_trait]
    impl DocumentSource for Unreadable {
        fn id(&self) -> &str {
            self.0
        }
        async fn read_text(&self) -> Result<String, DocumentReadError> {
            Err(DocumentReadError::new(
                self.0,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        }
    }

    fn growth_dict() -> Arc<PhraseDictionary> {
        Arc::new(PhraseDictionary::new(vec![
            PhraseEntry::new("growth", 1.0, 0.0).unwrap()
        ]))
    }

    #[tokio::test]
    async fn failure_is_isolated() {
        let docs: Vec<Box<dyn DocumentSource>> = vec![
            Box::new(InMemoryDocument::new("a", "growth")),
            Box::new(Unreadable("b")),
            Box::new(InMemoryDocument::new("c", "growth growth")),
        ];
        let out = BatchRunner::new(BatchOptions {
            document_workers: 2,
            ..Default::default()
        })
        .run(docs, growth_dict())
        .await;

        let ids: Vec<&str> = out.reports.iter().map(|r| r.document_id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].document_id, "b");
        assert!(matches!(out.failures[0].error, ScoreError::Read(_)));
        assert!(!out.is_complete());
    }

    #[tokio::test]
    async fn empty_batch() {
        let out = BatchRunner::default().run(Vec::new(), growth_dict()).await;
        assert!(out.reports.is_empty());
        assert!(out.is_complete());
    }

    #[tokio::test]
    async fn zero_timeout_skips_everything() {
        let docs: Vec<Box<dyn DocumentSource>> =
            vec![Box::new(InMemoryDocument::new("a", "growth"))];
        let out = BatchRunner::new(BatchOptions {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        })
        .run(docs, growth_dict())
        .await;
        assert!(out.reports.is_empty());
        assert!(matches!(
            out.failures[0].error,
            ScoreError::DeadlineExceeded { .. }
        ));
    }
}
