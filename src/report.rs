// src/report.rs
//! Finalized per-document result.

use crate::accumulator::Tally;
use crate::dictionary::PhraseDictionary;
use serde::{Serialize, Serializer};
use std::fmt;

/// `exploit / explore`, or `Undefined` when the explore score is exactly zero
/// or either score overflowed, so the ratio is never NaN or infinite.
///
/// Undefined shows up as `undefined` in text, as the JSON string
/// `"undefined"`, and as an empty cell in delimited output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn from_scores(exploit: f64, explore: f64) -> Self {
        if explore == 0.0 || !explore.is_finite() {
            return Ratio::Undefined;
        }
        let ratio = exploit / explore;
        if ratio.is_finite() {
            Ratio::Defined(ratio)
        } else {
            Ratio::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Ratio::Undefined)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{v}"),
            Ratio::Undefined => f.write_str("undefined"),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Defined(v) => serializer.serialize_f64(*v),
            Ratio::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseCount {
    pub phrase: String,
    pub count: u64,
}

/// Read-only once built: fields are private and only exposed through getters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    document_id: String,
    phrase_counts: Vec<PhraseCount>,
    explore_score: f64,
    exploit_score: f64,
    total_tokens: u64,
    ratio: Ratio,
}

impl ScoreReport {
    /// Freeze a finished tally.
    ///
    /// Scores are recomputed as `sum(count * weight)` in dictionary order, so
    /// the result does not depend on how many workers recorded matches or in
    /// which order.
    pub fn finalize(
        document_id: impl Into<String>,
        dictionary: &PhraseDictionary,
        tally: &Tally,
        total_tokens: u64,
    ) -> Self {
        let mut explore_score = 0.0;
        let mut exploit_score = 0.0;
        let mut phrase_counts = Vec::with_capacity(dictionary.len());

        for (entry, &count) in dictionary.entries().iter().zip(tally.counts()) {
            explore_score += count as f64 * entry.explore_weight();
            exploit_score += count as f64 * entry.exploit_weight();
            phrase_counts.push(PhraseCount {
                phrase: entry.key().to_string(),
                count,
            });
        }

        debug_assert!(
            agrees_with_running(explore_score, exploit_score, dictionary, tally),
            "recomputed scores drifted from the accumulator's running sums"
        );

        Self {
            document_id: document_id.into(),
            phrase_counts,
            explore_score,
            exploit_score,
            total_tokens,
            ratio: Ratio::from_scores(exploit_score, explore_score),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Counts for every dictionary phrase, in dictionary order.
    pub fn phrase_counts(&self) -> &[PhraseCount] {
        &self.phrase_counts
    }

    pub fn count(&self, phrase: &str) -> Option<u64> {
        self.phrase_counts
            .iter()
            .find(|pc| pc.phrase == phrase)
            .map(|pc| pc.count)
    }

    pub fn explore_score(&self) -> f64 {
        self.explore_score
    }

    pub fn exploit_score(&self) -> f64 {
        self.exploit_score
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn ratio(&self) -> Ratio {
        self.ratio
    }
}

/// Debug cross-check: running sums may differ from the recomputed ones only
/// by float rounding (summation order differs between worker counts).
fn agrees_with_running(
    explore: f64,
    exploit: f64,
    dictionary: &PhraseDictionary,
    tally: &Tally,
) -> bool {
    let (run_explore, run_exploit) = tally.running_scores();
    let mut scale_explore = 1.0f64;
    let mut scale_exploit = 1.0f64;
    for (entry, &count) in dictionary.entries().iter().zip(tally.counts()) {
        scale_explore += count as f64 * entry.explore_weight().abs();
        scale_exploit += count as f64 * entry.exploit_weight().abs();
    }
    let close = |a: f64, b: f64, scale: f64| {
        !a.is_finite() || !b.is_finite() || !scale.is_finite() || (a - b).abs() <= 1e-6 * scale
    };
    close(explore, run_explore, scale_explore) && close(exploit, run_exploit, scale_exploit)
}
