// src/accumulator.rs
//! Per-document aggregation state.
//!
//! `ScoreAccumulator::record_match` and `ScoreAccumulator::merge` are the only
//! mutations and both are serialized by a mutex, so concurrent scanners of the
//! same document never lose an increment or observe a torn sum.

use std::sync::{Mutex, PoisonError};

/// Plain counts + running sums. Also used as a worker-local buffer that is
/// merged into a shared accumulator in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    counts: Vec<u64>,
    explore: f64,
    exploit: f64,
}

impl Tally {
    /// Every phrase starts at count 0, so reports always carry the full key set.
    pub fn zeroed(phrases: usize) -> Self {
        Self {
            counts: vec![0; phrases],
            explore: 0.0,
            exploit: 0.0,
        }
    }

    pub fn record(&mut self, phrase: usize, explore_weight: f64, exploit_weight: f64) {
        self.counts[phrase] += 1;
        self.explore += explore_weight;
        self.exploit += exploit_weight;
    }

    pub fn merge(&mut self, other: &Tally) {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += *theirs;
        }
        self.explore += other.explore;
        self.exploit += other.exploit;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn matches(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Running (explore, exploit) sums in recording order.
    pub fn running_scores(&self) -> (f64, f64) {
        (self.explore, self.exploit)
    }
}

#[derive(Debug, Default)]
pub struct ScoreAccumulator {
    inner: Mutex<Tally>,
}

impl ScoreAccumulator {
    pub fn new(phrases: usize) -> Self {
        Self {
            inner: Mutex::new(Tally::zeroed(phrases)),
        }
    }

    /// Count one occurrence of `phrase` and add its weights.
    pub fn record_match(&self, phrase: usize, explore_weight: f64, exploit_weight: f64) {
        // A poisoned lock still holds whole updates; keep going with it.
        let mut tally = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        tally.record(phrase, explore_weight, exploit_weight);
    }

    /// Fold a worker-local tally in under a single lock acquisition.
    pub fn merge(&self, local: &Tally) {
        let mut tally = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        tally.merge(local);
    }

    pub fn into_tally(self) -> Tally {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_zeroed() {
        let acc = ScoreAccumulator::new(3);
        let t = acc.into_tally();
        assert_eq!(t.counts(), [0, 0, 0]);
        assert_eq!(t.running_scores(), (0.0, 0.0));
    }

    #[test]
    fn records_counts_and_sums() {
        let acc = ScoreAccumulator::new(2);
        acc.record_match(0, 1.0, 0.0);
        acc.record_match(1, 0.0, 2.0);
        acc.record_match(0, 1.0, 0.0);
        let t = acc.into_tally();
        assert_eq!(t.counts(), [2, 1]);
        assert_eq!(t.running_scores(), (2.0, 2.0));
        assert_eq!(t.matches(), 3);
    }

    #[test]
    fn no_increment_lost_under_contention() {
        let acc = Arc::new(ScoreAccumulator::new(2));
        let handles: Vec<_> = (0..8)
            .map(|w| {
                let acc = Arc::clone(&acc);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        acc.record_match(w % 2, 1.0, 0.5);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let t = Arc::try_unwrap(acc).unwrap().into_tally();
        assert_eq!(t.counts(), [40_000, 40_000]);
        assert_eq!(t.running_scores(), (80_000.0, 40_000.0));
    }

    #[test]
    fn concurrent_merges_sum_every_worker() {
        let acc = Arc::new(ScoreAccumulator::new(3));
        let handles: Vec<_> = (0..6)
            .map(|w| {
                let acc = Arc::clone(&acc);
                thread::spawn(move || {
                    let mut local = Tally::zeroed(3);
                    for _ in 0..1_000 {
                        local.record(w % 3, 0.25, 0.5);
                    }
                    acc.merge(&local);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let t = Arc::try_unwrap(acc).unwrap().into_tally();
        assert_eq!(t.counts(), [2_000, 2_000, 2_000]);
        assert_eq!(t.running_scores(), (1_500.0, 3_000.0));
    }

    #[test]
    fn merge_adds_local_tally() {
        let acc = ScoreAccumulator::new(2);
        acc.record_match(1, 0.0, 1.0);
        let mut local = Tally::zeroed(2);
        local.record(0, 3.0, 0.0);
        local.record(1, 0.0, 1.0);
        acc.merge(&local);
        let t = acc.into_tally();
        assert_eq!(t.counts(), [1, 2]);
        assert_eq!(t.running_scores(), (3.0, 2.0));
    }
}
