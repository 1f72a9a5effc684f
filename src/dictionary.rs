// src/dictionary.rs
//! Weighted phrase dictionary.
//!
//! Delimited input, one record per line:
//! ```text
//! growth,1.0,0.0
//! risk management,0.0,2.0
//! ```
//! Fields are `phrase, explore_weight, exploit_weight`. Phrases are normalized
//! with the document tokenizer so both sides compare like for like.

use crate::error::DictionaryParseError;
use crate::tokenize::tokenize;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One immutable weighted phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseEntry {
    tokens: Vec<String>,
    key: String,
    explore_weight: f64,
    exploit_weight: f64,
}

impl PhraseEntry {
    /// Normalize `raw_phrase` into tokens. Returns `None` when nothing is left
    /// after stripping non-letters.
    pub fn new(raw_phrase: &str, explore_weight: f64, exploit_weight: f64) -> Option<Self> {
        let tokens: Vec<String> = tokenize(raw_phrase).filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            return None;
        }
        let key = tokens.join(" ");
        Some(Self {
            tokens,
            key,
            explore_weight,
            exploit_weight,
        })
    }

    /// Build from a raw delimited record; `line` is used for error messages only.
    pub fn from_record(
        record: &csv::StringRecord,
        line: u64,
    ) -> Result<Self, DictionaryParseError> {
        if record.len() != 3 {
            return Err(DictionaryParseError::FieldCount {
                line,
                found: record.len(),
            });
        }
        let raw = &record[0];
        let explore = parse_weight(&record[1], "explore", line)?;
        let exploit = parse_weight(&record[2], "exploit", line)?;
        Self::new(raw, explore, exploit).ok_or_else(|| DictionaryParseError::EmptyPhrase {
            line,
            raw: raw.to_string(),
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Canonical joined form, used as the report key and CSV column label.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn explore_weight(&self) -> f64 {
        self.explore_weight
    }

    pub fn exploit_weight(&self) -> f64 {
        self.exploit_weight
    }
}

fn parse_weight(raw: &str, field: &'static str, line: u64) -> Result<f64, DictionaryParseError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| DictionaryParseError::InvalidWeight {
            line,
            field,
            value: raw.to_string(),
        })
}

/// Shape of the delimited dictionary file.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryFormat {
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for DictionaryFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
        }
    }
}

/// Ordered phrase list, shared read-only by every scoring worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhraseDictionary {
    entries: Vec<PhraseEntry>,
}

impl PhraseDictionary {
    /// Entries with the same canonical key are folded into the first one and
    /// their weights summed.
    pub fn new(entries: Vec<PhraseEntry>) -> Self {
        let mut out: Vec<PhraseEntry> = Vec::with_capacity(entries.len());
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(&idx) = seen.get(entry.key()) {
                let kept = &mut out[idx];
                kept.explore_weight += entry.explore_weight;
                kept.exploit_weight += entry.exploit_weight;
                warn!(
                    target: "dictionary",
                    phrase = entry.key(),
                    "duplicate phrase merged; weights summed"
                );
                continue;
            }
            seen.insert(entry.key.clone(), out.len());
            out.push(entry);
        }
        Self { entries: out }
    }

    /// Parse delimited records. A source with no records at all (empty, or a
    /// header only) is rejected.
    pub fn from_reader<R: Read>(
        reader: R,
        format: DictionaryFormat,
    ) -> Result<Self, DictionaryParseError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(format.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            entries.push(PhraseEntry::from_record(&record, line)?);
        }
        if entries.is_empty() {
            return Err(DictionaryParseError::Empty);
        }
        Ok(Self::new(entries))
    }

    pub fn from_path(path: &Path, format: DictionaryFormat) -> Result<Self, DictionaryParseError> {
        let file = File::open(path)?;
        let dict = Self::from_reader(file, format)?;
        info!(
            target: "dictionary",
            path = %path.display(),
            phrases = dict.len(),
            "dictionary loaded"
        );
        Ok(dict)
    }

    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PhraseEntry> {
        self.entries.get(index)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(PhraseEntry::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
