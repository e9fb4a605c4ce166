//! fcmean - rank features by mean absolute log2 fold change between class medians.

use anyhow::{Context, Result};
use clap::Parser;
use pairwise_de::data::{ExpressionMatrix, LabelVector};
use pairwise_de::logging::init_tracing;
use pairwise_de::pipeline::{run_fold_change, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fcmean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Expression matrix CSV: header of sample names, first column feature IDs
    matrix: PathBuf,

    /// Label CSV: header row, then one class label per sample
    labels: PathBuf,

    /// Number of classes; labels 1..=classes are compared pairwise
    classes: usize,

    /// Output path for the ranked summary
    #[arg(short, long, default_value = "fcmean.csv")]
    output: PathBuf,

    /// Also write the per-pair fold-change magnitudes here
    #[arg(long)]
    pairwise: Option<PathBuf>,

    /// Added to both medians before taking their ratio
    #[arg(long, default_value_t = 1.0)]
    pseudo_count: f64,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let matrix = ExpressionMatrix::from_csv(&cli.matrix)
        .with_context(|| format!("failed to load matrix {}", cli.matrix.display()))?;
    let labels = LabelVector::from_csv(&cli.labels)
        .with_context(|| format!("failed to load labels {}", cli.labels.display()))?;

    let config = PipelineConfig::new(cli.classes).with_pseudo_count(cli.pseudo_count);
    let output = run_fold_change(&matrix, &labels, &config).context("fold-change pipeline failed")?;

    if let Some(path) = &cli.pairwise {
        output
            .pairwise
            .write_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote pairwise fold changes");
    }
    output
        .summary
        .write_csv(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(path = %cli.output.display(), features = output.summary.len(), "wrote summary");

    Ok(())
}
