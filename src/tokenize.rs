// src/tokenize.rs
//! Document tokenizer: whitespace split, lowercase, letters only.
//!
//! A token made only of punctuation or digits ("2019", "--") normalizes to the
//! empty string. It is still emitted (and counted) so that word totals match
//! the plain whitespace count of the document.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::SplitWhitespace;

static NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\P{L}+").expect("non-letter regex"));

/// Lowercase `raw` and drop every character that is not a letter.
pub fn normalize_token(raw: &str) -> String {
    let lower = raw.to_lowercase();
    NON_LETTER.replace_all(&lower, "").into_owned()
}

/// Lazy token stream over a borrowed text. Clone it to restart from the top.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    words: SplitWhitespace<'a>,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.words.next().map(normalize_token)
    }
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        words: text.split_whitespace(),
    }
}
