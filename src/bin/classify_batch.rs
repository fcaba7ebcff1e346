// src/bin/classify_batch.rs
//
// Batch classifier: reads rows (JSON array or JSON Lines), classifies every
// row against the config directory and writes one merged JSON object per line.
//
// Run:
//   cargo run --bin classify-batch -- --data data/raw/jp_lights.jsonl --sample 1000

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use light_classifier::batch::{category_counts, classify_rows, merge_row, Row, DEFAULT_PROGRESS_EVERY};
use light_classifier::{Classifier, ClassifierConfig};

#[derive(Parser)]
#[command(name = "classify-batch", about = "Classify lighting product titles in bulk")]
struct Cli {
    /// Input rows: a JSON array of objects, or one JSON object per line
    #[arg(long)]
    data: PathBuf,

    /// Directory holding signals.json, scoring_models.json and hard_filters.json
    #[arg(long, default_value = "config", env = "CLASSIFIER_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Output file (JSON Lines)
    #[arg(long, default_value = "data/processed/output.jsonl")]
    output: PathBuf,

    /// Only process the first N rows
    #[arg(long)]
    sample: Option<usize>,
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    if text.trim_start().starts_with('[') {
        return serde_json::from_str(&text).with_context(|| format!("parsing {} as a JSON array", path.display()));
    }

    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line)
            .with_context(|| format!("{}:{}: invalid JSON", path.display(), idx + 1))?
        {
            Value::Object(row) => rows.push(row),
            _ => bail!("{}:{}: expected a JSON object", path.display(), idx + 1),
        }
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClassifierConfig::load_dir(&cli.config_dir)
        .with_context(|| format!("loading config from {}", cli.config_dir.display()))?;
    let classifier = Classifier::new(config)?;

    let mut rows = read_rows(&cli.data)?;
    let total_rows = rows.len();
    if let Some(n) = cli.sample {
        rows.truncate(n);
        info!(sample = rows.len(), total = total_rows, "sample mode");
    }
    info!(rows = rows.len(), data = %cli.data.display(), "classifying");

    let results = classify_rows(&classifier, &rows, DEFAULT_PROGRESS_EVERY, |done, total| {
        info!("progress: {done}/{total}");
    });

    let merged: Vec<Row> = rows
        .iter()
        .zip(&results)
        .map(|(row, result)| merge_row(row, result))
        .collect();
    write_rows(&cli.output, &merged)?;
    info!(output = %cli.output.display(), rows = merged.len(), "results written");

    println!("Category counts:");
    for c in category_counts(&results) {
        let pct = c.count as f64 * 100.0 / results.len() as f64;
        println!("  {:<16} {:>6}  ({:.1}%)", c.category, c.count, pct);
    }

    Ok(())
}
