// src/error.rs
//! Typed failures for dictionary loading and per-document scoring.

use thiserror::Error;

/// A dictionary record could not be turned into a phrase entry.
/// Fatal for the whole run: nothing is scored without a valid dictionary.
#[derive(Debug, Error)]
pub enum DictionaryParseError {
    #[error("dictionary line {line}: expected 3 fields (phrase, explore, exploit), found {found}")]
    FieldCount { line: u64, found: usize },
    #[error("dictionary line {line}: {field} weight `{value}` is not a finite number")]
    InvalidWeight {
        line: u64,
        field: &'static str,
        value: String,
    },
    #[error("dictionary line {line}: phrase `{raw}` has no letters after normalization")]
    EmptyPhrase { line: u64, raw: String },
    #[error("dictionary has no phrase records")]
    Empty,
    #[error("dictionary read failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("dictionary io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a document's text could not be loaded.
#[derive(Debug, Error)]
pub enum ReadErrorKind {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
#[error("document `{document_id}` could not be read: {kind}")]
pub struct DocumentReadError {
    pub document_id: String,
    #[source]
    pub kind: ReadErrorKind,
}

impl DocumentReadError {
    pub fn new(document_id: impl Into<String>, kind: impl Into<ReadErrorKind>) -> Self {
        Self {
            document_id: document_id.into(),
            kind: kind.into(),
        }
    }
}

/// Batch-level failure of a single document. Siblings keep running.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Read(#[from] DocumentReadError),
    #[error("document `{document_id}` skipped: batch deadline passed before it started")]
    DeadlineExceeded { document_id: String },
    #[error("scoring task for `{document_id}` aborted: {reason}")]
    TaskAborted { document_id: String, reason: String },
}

impl ScoreError {
    pub fn document_id(&self) -> &str {
        match self {
            ScoreError::Read(e) => &e.document_id,
            ScoreError::DeadlineExceeded { document_id }
            | ScoreError::TaskAborted { document_id, .. } => document_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_document() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DocumentReadError::new("acme-2019.txt", io);
        let msg = err.to_string();
        assert!(msg.contains("acme-2019.txt"), "{msg}");
        assert!(msg.contains("gone"), "{msg}");

        let wrapped = ScoreError::from(err);
        assert_eq!(wrapped.document_id(), "acme-2019.txt");
    }
}
