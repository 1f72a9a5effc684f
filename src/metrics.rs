// src/metrics.rs
//! Scoring telemetry via the `metrics` facade.
//!
//! Without an installed recorder every call is a no-op. The CLI installs a
//! Prometheus recorder when `--metrics-out` is given and writes the rendered
//! text there after the run (node_exporter textfile format).

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::path::Path;

pub const DOCUMENTS_TOTAL: &str = "wordscore_documents_total";
pub const DOCUMENT_FAILURES_TOTAL: &str = "wordscore_document_failures_total";
pub const TOKENS_TOTAL: &str = "wordscore_tokens_total";
pub const PHRASE_MATCHES_TOTAL: &str = "wordscore_phrase_matches_total";
pub const DOCUMENT_DURATION_MS: &str = "wordscore_document_duration_ms";
pub const BATCH_LAST_RUN_TS: &str = "wordscore_batch_last_run_ts";

/// One-time metrics registration (so series carry help text).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(DOCUMENTS_TOTAL, "Documents scored successfully.");
        describe_counter!(
            DOCUMENT_FAILURES_TOTAL,
            "Documents that failed to read, timed out, or aborted."
        );
        describe_counter!(TOKENS_TOTAL, "Normalized tokens scanned.");
        describe_counter!(PHRASE_MATCHES_TOTAL, "Dictionary phrase occurrences found.");
        describe_histogram!(
            DOCUMENT_DURATION_MS,
            "Per-document scoring time in milliseconds."
        );
        describe_gauge!(BATCH_LAST_RUN_TS, "Unix ts when the last batch finished.");
    });
}

/// Install the global Prometheus recorder. Fails if a recorder already exists.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("installing prometheus recorder")
}

/// Render the current series and write them to `path`.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    std::fs::write(path, handle.render())
        .with_context(|| format!("writing metrics snapshot to {}", path.display()))
}
