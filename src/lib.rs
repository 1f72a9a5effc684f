// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod accumulator;
pub mod batch;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod ingest;
pub mod matcher;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod tokenize;

// ---- Re-exports for stable public API ----
pub use crate::batch::{BatchFailure, BatchOptions, BatchOutcome, BatchRunner};
pub use crate::dictionary::{DictionaryFormat, PhraseDictionary, PhraseEntry};
pub use crate::error::{DictionaryParseError, DocumentReadError, ScoreError};
pub use crate::ingest::{DocumentSource, FileDocument, InMemoryDocument};
pub use crate::report::{Ratio, ScoreReport};
pub use crate::scorer::DocumentScorer;
