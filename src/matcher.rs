// src/matcher.rs
//! Positional phrase matching over a materialized token sequence.
//!
//! A phrase matches at index `i` iff `tokens[i..i + k]` equals its `k` tokens
//! exactly. Every phrase is checked on its own: several phrases may match at
//! one position (e.g. "risk" and "risk management") and all of them count.

use crate::dictionary::PhraseDictionary;
use std::collections::HashMap;

/// Exact window check. Windows running past the end never match.
pub fn matches_at<S: AsRef<str>>(tokens: &[S], start: usize, phrase: &[String]) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let Some(end) = start.checked_add(phrase.len()) else {
        return false;
    };
    match tokens.get(start..end) {
        Some(window) => window.iter().zip(phrase).all(|(t, p)| t.as_ref() == p),
        None => false,
    }
}

/// First-token index over a dictionary. Only phrases whose first token equals
/// the token under the cursor are window-checked.
#[derive(Debug)]
pub struct PhraseMatcher<'d> {
    dictionary: &'d PhraseDictionary,
    by_first: HashMap<&'d str, Vec<usize>>,
}

impl<'d> PhraseMatcher<'d> {
    pub fn new(dictionary: &'d PhraseDictionary) -> Self {
        let mut by_first: HashMap<&'d str, Vec<usize>> = HashMap::new();
        for (idx, entry) in dictionary.entries().iter().enumerate() {
            if let Some(first) = entry.tokens().first() {
                by_first.entry(first.as_str()).or_default().push(idx);
            }
        }
        Self {
            dictionary,
            by_first,
        }
    }

    pub fn dictionary(&self) -> &'d PhraseDictionary {
        self.dictionary
    }

    /// Indices (dictionary order) of every phrase that matches at `start`.
    pub fn matches_starting_at<'a, S: AsRef<str>>(
        &'a self,
        tokens: &'a [S],
        start: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        let candidates: &[usize] = tokens
            .get(start)
            .and_then(|t| self.by_first.get(t.as_ref()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        candidates.iter().copied().filter(move |&idx| {
            self.dictionary
                .get(idx)
                .is_some_and(|e| matches_at(tokens, start, e.tokens()))
        })
    }
}
