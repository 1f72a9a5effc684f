// src/ingest/mod.rs
//! Document discovery: turn a directory into an ordered list of readable documents.

pub mod types;

pub use types::{DocumentSource, FileDocument, InMemoryDocument};

use anyhow::{Context, Result};
use std::path::Path;

/// Extension filter, case-insensitive. Empty list accepts every file.
pub fn has_wanted_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    extensions
        .iter()
        .any(|w| w.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// List regular files directly inside `dir` (no recursion), sorted by file
/// name so runs are reproducible.
pub async fn discover_documents(dir: &Path, extensions: &[String]) -> Result<Vec<FileDocument>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("listing documents in {}", dir.display()))?;

    let mut docs = Vec::new();
    let mut skipped = 0usize;
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("reading entry in {}", dir.display()))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("inspecting {}", path.display()))?;
        if !file_type.is_file() || !has_wanted_extension(&path, extensions) {
            skipped += 1;
            continue;
        }
        docs.push(FileDocument::new(path));
    }

    docs.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::info!(
        target: "ingest",
        dir = %dir.display(),
        found = docs.len(),
        skipped,
        "documents discovered"
    );
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_filter_is_case_insensitive() {
        let wanted = vec!["txt".to_string(), ".md".into()];
        assert!(has_wanted_extension(Path::new("a/REPORT.TXT"), &wanted));
        assert!(has_wanted_extension(Path::new("notes.md"), &wanted));
        assert!(!has_wanted_extension(Path::new("data.csv"), &wanted));
        assert!(!has_wanted_extension(Path::new("README"), &wanted));
        assert!(has_wanted_extension(Path::new("README"), &[]));
    }

    #[tokio::test]
    async fn discovers_sorted_regular_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), "beta").unwrap();
        fs::write(tmp.path().join("a.txt"), "alpha").unwrap();
        fs::write(tmp.path().join("skip.csv"), "x").unwrap();
        fs::create_dir(tmp.path().join("nested.txt")).unwrap();

        let docs = discover_documents(tmp.path(), &["txt".to_string()])
            .await
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].read_text().await.unwrap(), "alpha");
    }

    #[tokio::test]
    async fn missing_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover_documents(&tmp.path().join("nope"), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("listing documents"));
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("latin1.txt");
        fs::write(&p, [0x66u8, 0x6f, 0xff, 0xfe]).unwrap();
        let err = FileDocument::new(&p).read_text().await.unwrap_err();
        assert_eq!(err.document_id, "latin1.txt");
        assert!(matches!(err.kind, crate::error::ReadErrorKind::Encoding(_)));
    }
}
