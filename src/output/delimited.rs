// src/output/delimited.rs
//! Delimited results, column layout kept compatible with the legacy tool:
//!
//! `Name,Explore,Exploit,ratio,<phrase…>,WordTotal`
//!
//! The `ratio` column is left empty (spreadsheets fill it with a formula).

use crate::dictionary::PhraseDictionary;
use crate::report::ScoreReport;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn header(dictionary: &PhraseDictionary) -> Vec<String> {
    let mut cols = Vec::with_capacity(dictionary.len() + 5);
    cols.extend(["Name", "Explore", "Exploit", "ratio"].map(String::from));
    cols.extend(dictionary.keys().map(str::to_string));
    cols.push("WordTotal".into());
    cols
}

pub fn row(dictionary: &PhraseDictionary, report: &ScoreReport) -> Vec<String> {
    let mut cols = Vec::with_capacity(dictionary.len() + 5);
    cols.push(report.document_id().to_string());
    cols.push(report.explore_score().to_string());
    cols.push(report.exploit_score().to_string());
    cols.push(String::new());
    // phrase_counts is already in dictionary order
    debug_assert!(dictionary.keys().eq(report.phrase_counts().iter().map(|pc| pc.phrase.as_str())));
    cols.extend(report.phrase_counts().iter().map(|pc| pc.count.to_string()));
    cols.push(report.total_tokens().to_string());
    cols
}

pub fn write_csv<W: Write>(
    writer: W,
    dictionary: &PhraseDictionary,
    reports: &[ScoreReport],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(dictionary))?;
    for report in reports {
        wtr.write_record(row(dictionary, report))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(
    path: &Path,
    dictionary: &PhraseDictionary,
    reports: &[ScoreReport],
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating csv output {}", path.display()))?;
    write_csv(file, dictionary, reports)
        .with_context(|| format!("writing csv output {}", path.display()))?;
    tracing::info!(target: "output", path = %path.display(), rows = reports.len(), "csv written");
    Ok(())
}
