//! The two ranking pipelines and their shared configuration.
//!
//! Both follow the same shape: validate the configuration, check that the
//! labels line up with the matrix, partition samples by class, compute one
//! statistic per feature and class pair, reduce each feature's row to a single
//! value and rank the features by it.

pub mod fold_change;
pub mod significance;

pub use fold_change::run_fold_change;
pub use significance::run_significance;

use crate::data::{ExpressionMatrix, LabelVector, PairwiseTable, SummaryResult};
use crate::error::{DeError, Result};
use crate::testing::utils::ClassGroups;
use tracing::{info, warn};

/// What the significance pipeline does with a pairwise test that has no p-value
/// (all values tied, or missing values in the input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Record NaN; the minimum over the feature's pairs ignores it.
    #[default]
    Propagate,
    /// Leave the feature out of the summary.
    SkipFeature,
    /// Abort the run with [`DeError::StatisticalDegenerate`].
    Fail,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of classes; labels `1..=classes` are compared pairwise
    pub classes: usize,
    /// Added to both medians before taking their ratio
    pub pseudo_count: f64,
    pub degenerate_policy: DegeneratePolicy,
}

impl PipelineConfig {
    pub fn new(classes: usize) -> Self {
        PipelineConfig {
            classes,
            pseudo_count: 1.0,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }

    pub fn with_pseudo_count(mut self, pseudo_count: f64) -> Self {
        self.pseudo_count = pseudo_count;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes < 2 {
            return Err(DeError::InvalidParameter(format!(
                "at least 2 classes are needed for a pairwise comparison, got {}",
                self.classes
            )));
        }
        if !self.pseudo_count.is_finite() || self.pseudo_count < 0.0 {
            return Err(DeError::InvalidParameter(format!(
                "pseudo-count must be a finite non-negative number, got {}",
                self.pseudo_count
            )));
        }
        Ok(())
    }
}

/// Everything a pipeline produces: the per-pair table and the ranked summary.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub pairwise: PairwiseTable,
    pub summary: SummaryResult,
}

/// Shared preamble of both pipelines.
fn prepare_groups(
    matrix: &ExpressionMatrix,
    labels: &LabelVector,
    config: &PipelineConfig,
) -> Result<ClassGroups> {
    config.validate()?;
    labels.check_matches(matrix)?;

    let groups = ClassGroups::from_labels(labels.as_slice(), config.classes)?;
    if !groups.excluded().is_empty() {
        warn!(
            excluded = groups.excluded().len(),
            classes = config.classes,
            "samples with labels outside 1..=classes take part in no comparison"
        );
    }
    info!(
        features = matrix.n_features(),
        samples = matrix.n_samples(),
        class_sizes = ?groups.sizes(),
        "partitioned samples by class"
    );
    Ok(groups)
}
