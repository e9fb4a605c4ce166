//! Mean absolute log2 fold change between class medians.

use super::{prepare_groups, PipelineConfig, PipelineOutput};
use crate::data::{ExpressionMatrix, LabelVector, PairwiseTable, SortOrder, SummaryResult};
use crate::error::Result;
use crate::testing::effect::pairwise_fold_changes;
use crate::testing::inference::MatrixStatTests;
use crate::testing::utils::class_pairs;
use tracing::{debug, info};

pub const VALUE_COLUMN: &str = "mean_value";

/// Rank features by the mean over all class pairs of
/// `|log2((median_i + c) / (median_j + c))|`, largest first.
pub fn run_fold_change(
    matrix: &ExpressionMatrix,
    labels: &LabelVector,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let groups = prepare_groups(matrix, labels, config)?;

    let medians = matrix.values().class_medians(&groups);
    debug!(shape = ?medians.dim(), "computed class median profile");

    let pairs = class_pairs(config.classes);
    let magnitudes = pairwise_fold_changes(medians.view(), &pairs, config.pseudo_count);
    let pairwise = PairwiseTable::new(matrix.feature_ids().to_vec(), pairs, magnitudes)?;

    let means = pairwise.row_means();
    let summary = SummaryResult::ranked(
        VALUE_COLUMN,
        matrix.feature_ids(),
        &means,
        SortOrder::Descending,
    );
    info!(
        features = summary.len(),
        pairs = pairwise.pairs().len(),
        "ranked features by mean absolute log2 fold change"
    );

    Ok(PipelineOutput { pairwise, summary })
}
