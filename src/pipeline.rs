// src/pipeline.rs
//! End-to-end run used by the binary: dictionary → discovery → batch.
//!
//! The dictionary is parsed before the documents directory is even listed, so
//! a malformed record aborts the run with nothing scored.

use crate::batch::{BatchOutcome, BatchRunner};
use crate::config::ScorerConfig;
use crate::dictionary::PhraseDictionary;
use crate::ingest::{discover_documents, DocumentSource};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

pub struct RunResult {
    pub dictionary: Arc<PhraseDictionary>,
    pub outcome: BatchOutcome,
}

pub async fn score_directory(cfg: &ScorerConfig) -> Result<RunResult> {
    // 1) Dictionary (fail fast)
    let format = cfg.dictionary_format()?;
    let dictionary = PhraseDictionary::from_path(&cfg.dictionary.path, format)
        .with_context(|| format!("loading dictionary {}", cfg.dictionary.path.display()))?;
    let dictionary = Arc::new(dictionary);

    // 2) Documents
    let files = discover_documents(&cfg.documents.dir, &cfg.documents.extensions).await?;
    let documents: Vec<Box<dyn DocumentSource>> = files
        .into_iter()
        .map(|f| Box::new(f) as Box<dyn DocumentSource>)
        .collect();

    // 3) Score
    let options = cfg.batch_options();
    info!(
        documents = documents.len(),
        phrases = dictionary.len(),
        workers = options.effective_document_workers(),
        phrase_workers = options.phrase_workers,
        timeout = ?options.timeout,
        "scoring run started"
    );
    let outcome = BatchRunner::new(options)
        .run(documents, Arc::clone(&dictionary))
        .await;

    Ok(RunResult {
        dictionary,
        outcome,
    })
}

/// Report an error that ends the run through the installed subscriber, so
/// JSON log output covers the fatal path too.
pub fn log_fatal(err: &anyhow::Error) {
    error!(target: "wordscore", error = %format!("{err:#}"), "run aborted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn fatal_error_goes_through_json_subscriber() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();

        let err = anyhow::anyhow!("line 2: bad weight").context("loading dictionary wordlist.csv");
        tracing::subscriber::with_default(subscriber, || log_fatal(&err));

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let line: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(line["level"], "ERROR");
        assert_eq!(line["fields"]["message"], "run aborted");
        assert_eq!(
            line["fields"]["error"],
            "loading dictionary wordlist.csv: line 2: bad weight"
        );
    }
}
