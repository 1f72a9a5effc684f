//! wordscore: binary entrypoint
//! Loads the phrase dictionary, scores every document in a directory, and
//! writes console/CSV/JSON results.
//!
//! Exit status: 0 all documents scored, 1 fatal error (config, dictionary,
//! discovery, output), 2 finished with per-document failures.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wordscore::config::ScorerConfig;
use wordscore::output::{console, delimited, json};
use wordscore::pipeline::{score_directory, RunResult};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "wordscore",
    about = "Score documents for exploration/exploitation tone against a weighted phrase list",
    version
)]
struct Cli {
    /// Config file (defaults to $WORDSCORE_CONFIG_PATH or config/wordscore.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Phrase dictionary: phrase,explore_weight,exploit_weight per line
    #[arg(long)]
    dictionary: Option<PathBuf>,
    /// Directory holding the documents to score
    #[arg(long)]
    documents: Option<PathBuf>,
    /// CSV result file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write a JSON summary here
    #[arg(long)]
    json: Option<PathBuf>,
    /// Documents scored concurrently (0 = available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Threads used to scan a single document
    #[arg(long)]
    phrase_workers: Option<usize>,
    /// Skip documents that have not started after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Write a Prometheus text snapshot of run metrics here
    #[arg(long)]
    metrics_out: Option<PathBuf>,
    /// Do not print per-document results to stdout
    #[arg(long)]
    quiet: bool,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordscore=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn resolve_config(cli: &Cli) -> Result<ScorerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let mut cfg = ScorerConfig::load_from_file(path)?;
            cfg.apply_env_overrides(|k| std::env::var(k).ok())?;
            cfg
        }
        None => ScorerConfig::load()?,
    };

    // CLI flags win over file and env
    if let Some(p) = &cli.dictionary {
        cfg.dictionary.path = p.clone();
    }
    if let Some(p) = &cli.documents {
        cfg.documents.dir = p.clone();
    }
    if let Some(p) = &cli.output {
        cfg.output.csv = Some(p.clone());
    }
    if let Some(p) = &cli.json {
        cfg.output.json = Some(p.clone());
    }
    if let Some(p) = &cli.metrics_out {
        cfg.output.metrics = Some(p.clone());
    }
    if let Some(n) = cli.workers {
        cfg.workers.documents = n;
    }
    if let Some(n) = cli.phrase_workers {
        cfg.workers.phrases = n;
    }
    if let Some(s) = cli.timeout_secs {
        cfg.batch.timeout_secs = Some(s);
    }
    if cli.quiet {
        cfg.output.console = false;
    }
    Ok(cfg)
}

async fn run(cli: Cli) -> Result<bool> {
    let cfg = resolve_config(&cli)?;

    let metrics_handle = match &cfg.output.metrics {
        Some(_) => Some(wordscore::metrics::install_prometheus()?),
        None => None,
    };

    let RunResult {
        dictionary,
        outcome,
    } = score_directory(&cfg).await?;

    if cfg.output.console {
        console::print_outcome(&outcome).context("writing console output")?;
    }
    if let Some(path) = &cfg.output.csv {
        delimited::write_csv_file(path, &dictionary, &outcome.reports)?;
    }
    if let Some(path) = &cfg.output.json {
        json::write_json_file(path, &json::RunSummary::new(&outcome, dictionary.len()))?;
    }
    if let (Some(handle), Some(path)) = (&metrics_handle, &cfg.output.metrics) {
        wordscore::metrics::write_snapshot(handle, path)?;
    }

    Ok(outcome.is_complete())
}

#[tokio::main]
async fn main() {
    // Load .env if present; no-op otherwise.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            wordscore::pipeline::log_fatal(&err);
            std::process::exit(1);
        }
    }
}
