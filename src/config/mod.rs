// src/config/mod.rs
//! Run configuration: TOML file → environment overrides → CLI overrides (in `main`).
//!
//! ```toml
//! [dictionary]
//! path = "wordlist.csv"
//! delimiter = ","
//! has_header = false
//!
//! [documents]
//! dir = "Textfiles"
//! extensions = ["txt"]
//!
//! [output]
//! csv = "result.csv"
//! json = "result.json"
//! console = true
//!
//! [workers]
//! documents = 0   # 0 = available parallelism
//! phrases = 1
//!
//! [batch]
//! timeout_secs = 600
//! ```

use crate::batch::BatchOptions;
use crate::dictionary::DictionaryFormat;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/wordscore.toml";

pub const ENV_CONFIG_PATH: &str = "WORDSCORE_CONFIG_PATH";
pub const ENV_DICTIONARY: &str = "WORDSCORE_DICTIONARY";
pub const ENV_DOCUMENTS_DIR: &str = "WORDSCORE_DOCUMENTS_DIR";
pub const ENV_OUTPUT_CSV: &str = "WORDSCORE_OUTPUT_CSV";
pub const ENV_WORKERS: &str = "WORDSCORE_WORKERS";

fn default_dictionary_path() -> PathBuf {
    PathBuf::from("wordlist.csv")
}
fn default_delimiter() -> String {
    ",".into()
}
fn default_documents_dir() -> PathBuf {
    PathBuf::from("Textfiles")
}
fn default_csv() -> Option<PathBuf> {
    Some(PathBuf::from("result.csv"))
}
fn default_true() -> bool {
    true
}
fn default_phrase_workers() -> usize {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub dictionary: DictionarySection,
    pub documents: DocumentsSection,
    pub output: OutputSection,
    pub workers: WorkersSection,
    pub batch: BatchSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySection {
    #[serde(default = "default_dictionary_path")]
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub has_header: bool,
}

impl Default for DictionarySection {
    fn default() -> Self {
        Self {
            path: default_dictionary_path(),
            delimiter: default_delimiter(),
            has_header: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsSection {
    #[serde(default = "default_documents_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for DocumentsSection {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
            extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_csv")]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub json: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub console: bool,
    /// Prometheus text snapshot written after the run.
    #[serde(default)]
    pub metrics: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            csv: default_csv(),
            json: None,
            console: true,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkersSection {
    #[serde(default)]
    pub documents: usize,
    #[serde(default = "default_phrase_workers")]
    pub phrases: usize,
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self {
            documents: 0,
            phrases: default_phrase_workers(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchSection {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ScorerConfig {
    /// Resolve the config path from `WORDSCORE_CONFIG_PATH` (must exist) or
    /// the default path (optional), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", path.display());
                }
                Self::load_from_file(&path)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load_from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ScorerConfig = toml::from_str(s)?;
        // fail early on a bad delimiter rather than at dictionary load
        cfg.dictionary_format()?;
        Ok(cfg)
    }

    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_DICTIONARY) {
            self.dictionary.path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_DOCUMENTS_DIR) {
            self.documents.dir = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_OUTPUT_CSV) {
            self.output.csv = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(ENV_WORKERS) {
            self.workers.documents = v
                .trim()
                .parse()
                .map_err(|e| anyhow!("{ENV_WORKERS}=`{v}` is not a worker count: {e}"))?;
        }
        Ok(())
    }

    pub fn dictionary_format(&self) -> Result<DictionaryFormat> {
        let d = self.dictionary.delimiter.as_bytes();
        let delimiter = match d {
            [b] if b.is_ascii() => *b,
            _ => bail!(
                "dictionary delimiter must be a single ASCII character, got `{}`",
                self.dictionary.delimiter
            ),
        };
        Ok(DictionaryFormat {
            delimiter,
            has_header: self.dictionary.has_header,
        })
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            document_workers: self.workers.documents,
            phrase_workers: self.workers.phrases.max(1),
            timeout: self.batch.timeout_secs.map(Duration::from_secs),
        }
    }
}
