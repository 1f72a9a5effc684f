// src/scorer.rs
//! Single-document scoring: tokenize → match at every position → accumulate → freeze.
//!
//! With `phrase_workers > 1` the token positions are split into contiguous
//! chunks scanned on scoped threads. Each thread fills its own `Tally` and
//! merges it into the shared accumulator once. Results are identical for any
//! worker count.

use crate::accumulator::{ScoreAccumulator, Tally};
use crate::dictionary::PhraseDictionary;
use crate::error::ScoreError;
use crate::ingest::DocumentSource;
use crate::matcher::PhraseMatcher;
use crate::metrics::{DOCUMENT_DURATION_MS, PHRASE_MATCHES_TOTAL, TOKENS_TOTAL};
use crate::report::ScoreReport;
use crate::tokenize::tokenize;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct DocumentScorer {
    phrase_workers: usize,
}

impl Default for DocumentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentScorer {
    /// Sequential scan.
    pub fn new() -> Self {
        Self { phrase_workers: 1 }
    }

    /// Scan each document with up to `workers` threads (0 is treated as 1).
    pub fn with_phrase_workers(workers: usize) -> Self {
        Self {
            phrase_workers: workers.max(1),
        }
    }

    pub fn phrase_workers(&self) -> usize {
        self.phrase_workers
    }

    /// Read `source` eagerly, then score its text on a blocking thread.
    ///
    /// Read failures come back as `ScoreError::Read` carrying the document id;
    /// a scoring task that panics or is cancelled becomes `TaskAborted`.
    pub async fn score_document(
        &self,
        source: &dyn DocumentSource,
        dictionary: Arc<PhraseDictionary>,
    ) -> Result<ScoreReport, ScoreError> {
        let text = source.read_text().await?;

        let begun = Instant::now();
        let scorer = *self;
        let id = source.id().to_string();
        let report = tokio::task::spawn_blocking(move || scorer.score_text(&id, &text, &dictionary))
            .await
            .map_err(|e| ScoreError::TaskAborted {
                document_id: source.id().to_string(),
                reason: e.to_string(),
            })?;
        histogram!(DOCUMENT_DURATION_MS).record(begun.elapsed().as_secs_f64() * 1000.0);

        Ok(report)
    }

    pub fn score_text(
        &self,
        document_id: &str,
        text: &str,
        dictionary: &PhraseDictionary,
    ) -> ScoreReport {
        let tokens: Vec<String> = tokenize(text).collect();
        let matcher = PhraseMatcher::new(dictionary);
        let acc = ScoreAccumulator::new(dictionary.len());

        let workers = self.phrase_workers.min(tokens.len()).max(1);
        if workers == 1 {
            scan(&matcher, &tokens, 0..tokens.len(), |idx, explore, exploit| {
                acc.record_match(idx, explore, exploit)
            });
        } else {
            let chunk = tokens.len().div_ceil(workers);
            thread::scope(|s| {
                for start in (0..tokens.len()).step_by(chunk) {
                    let end = (start + chunk).min(tokens.len());
                    let (matcher, tokens, acc) = (&matcher, &tokens, &acc);
                    s.spawn(move || {
                        let mut local = Tally::zeroed(matcher.dictionary().len());
                        scan(matcher, tokens, start..end, |idx, explore, exploit| {
                            local.record(idx, explore, exploit)
                        });
                        acc.merge(&local);
                    });
                }
            });
        }

        let tally = acc.into_tally();
        let total_tokens = tokens.len() as u64;
        let empty_tokens = tokens.iter().filter(|t| t.is_empty()).count();

        counter!(TOKENS_TOTAL).increment(total_tokens);
        counter!(PHRASE_MATCHES_TOTAL).increment(tally.matches());
        debug!(
            target: "scorer",
            document = document_id,
            total_tokens,
            empty_tokens,
            matches = tally.matches(),
            workers,
            "document scanned"
        );

        ScoreReport::finalize(document_id, dictionary, &tally, total_tokens)
    }
}

/// Windows may extend past `positions.end`; only the start index is bounded.
fn scan<F>(
    matcher: &PhraseMatcher<'_>,
    tokens: &[String],
    positions: std::ops::Range<usize>,
    mut record: F,
) where
    F: FnMut(usize, f64, f64),
{
    let dictionary = matcher.dictionary();
    for i in positions {
        for idx in matcher.matches_starting_at(tokens, i) {
            if let Some(entry) = dictionary.get(idx) {
                record(idx, entry.explore_weight(), entry.exploit_weight());
            }
        }
    }
}
