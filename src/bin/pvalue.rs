//! pvalue - rank features by their minimum pairwise Mann-Whitney p-value.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pairwise_de::data::{ExpressionMatrix, LabelVector};
use pairwise_de::logging::init_tracing;
use pairwise_de::pipeline::{run_significance, DegeneratePolicy, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// CLI-friendly degenerate test policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDegeneratePolicy {
    /// Record NaN; the feature's minimum ignores it
    Propagate,
    /// Leave the feature out of the summary
    SkipFeature,
    /// Abort the run
    Fail,
}

impl From<CliDegeneratePolicy> for DegeneratePolicy {
    fn from(policy: CliDegeneratePolicy) -> Self {
        match policy {
            CliDegeneratePolicy::Propagate => DegeneratePolicy::Propagate,
            CliDegeneratePolicy::SkipFeature => DegeneratePolicy::SkipFeature,
            CliDegeneratePolicy::Fail => DegeneratePolicy::Fail,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pvalue")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Expression matrix CSV: header of sample names, first column feature IDs
    matrix: PathBuf,

    /// Label CSV: header row, then one class label per sample
    labels: PathBuf,

    /// Number of classes; labels 1..=classes are compared pairwise
    classes: usize,

    /// Output path for the ranked summary
    #[arg(short, long, default_value = "pvalue.csv")]
    output: PathBuf,

    /// Also write the per-pair p-values here
    #[arg(long)]
    pairwise: Option<PathBuf>,

    /// What to do when a pairwise test has no p-value (all values tied)
    #[arg(long, value_enum, default_value_t = CliDegeneratePolicy::Propagate)]
    on_degenerate: CliDegeneratePolicy,

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

    let config =
        PipelineConfig::new(cli.classes).with_degenerate_policy(cli.on_degenerate.into());
    let output =
        run_significance(&matrix, &labels, &config).context("significance pipeline failed")?;

    if let Some(path) = &cli.pairwise {
        output
            .pairwise
            .write_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote pairwise p-values");
    }
    output
        .summary
        .write_csv(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(path = %cli.output.display(), features = output.summary.len(), "wrote summary");

    Ok(())
}
