// src/ingest/types.rs
use crate::error::{DocumentReadError, ReadErrorKind};
use std::path::PathBuf;

/// A document the batch can read. Reading is eager: the whole text is loaded
/// before scoring starts.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    fn id(&self) -> &str;
    async fn read_text(&self) -> Result<String, DocumentReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryDocument {
    pub id: String,
    pub text: String,
}

impl InMemoryDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentSource for InMemoryDocument {
    fn id(&self) -> &str {
        &self.id
    }

    async fn read_text(&self) -> Result<String, DocumentReadError> {
        Ok(self.text.clone())
    }
}

/// File on disk; id is the file name (e.g. `acme-2019.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDocument {
    pub id: String,
    pub path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { id, path }
    }
}

#[async_trait::async_trait]
impl DocumentSource for FileDocument {
    fn id(&self) -> &str {
        &self.id
    }

    async fn read_text(&self) -> Result<String, DocumentReadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DocumentReadError::new(&self.id, e))?;
        String::from_utf8(bytes).map_err(|e| DocumentReadError::new(&self.id, ReadErrorKind::from(e)))
    }
}
