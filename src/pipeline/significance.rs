//! Minimum pairwise Mann-Whitney p-value per feature.

use super::{prepare_groups, DegeneratePolicy, PipelineConfig, PipelineOutput};
use crate::data::{ExpressionMatrix, LabelVector, PairwiseTable, SortOrder, SummaryResult};
use crate::error::{DeError, Result};
use crate::testing::inference::MatrixStatTests;
use crate::testing::utils::class_pairs;
use crate::testing::Alternative;
use ndarray::Array2;
use tracing::{debug, info, warn};

pub const VALUE_COLUMN: &str = "min_value";

/// Rank features by their smallest two-sided Mann-Whitney p-value over all
/// class pairs, most significant first.
pub fn run_significance(
    matrix: &ExpressionMatrix,
    labels: &LabelVector,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let groups = prepare_groups(matrix, labels, config)?;
    let pairs = class_pairs(config.classes);
    let n_features = matrix.n_features();

    let mut p_values = Array2::from_elem((n_features, pairs.len()), f64::NAN);
    let mut degenerate = vec![false; n_features];

    let class_indices = |class: usize| {
        groups.indices(class).ok_or_else(|| {
            DeError::InvalidParameter(format!("class {} outside 1..={}", class, config.classes))
        })
    };

    for (col, &pair) in pairs.iter().enumerate() {
        let results = matrix.values().mann_whitney_test(
            class_indices(pair.first)?,
            class_indices(pair.second)?,
            Alternative::TwoSided,
        )?;
        for (feature, result) in results.iter().enumerate() {
            p_values[[feature, col]] = result.p_value;
            if result.is_degenerate() {
                degenerate[feature] = true;
            }
        }
        debug!(pair = %pair, "tested class pair");
    }

    let n_degenerate = degenerate.iter().filter(|&&d| d).count();
    if n_degenerate > 0 {
        match config.degenerate_policy {
            DegeneratePolicy::Fail => {
                // Report the first failure in feature order, then pair order.
                for (feature, row) in p_values.rows().into_iter().enumerate() {
                    if let Some(col) = row.iter().position(|p| p.is_nan()) {
                        return Err(DeError::StatisticalDegenerate {
                            feature: matrix.feature_ids()[feature].clone(),
                            pair: pairs[col],
                        });
                    }
                }
            }
            DegeneratePolicy::Propagate => {
                warn!(features = n_degenerate, "degenerate pairwise tests recorded as NaN");
            }
            DegeneratePolicy::SkipFeature => {
                warn!(features = n_degenerate, "features with degenerate pairwise tests left out");
            }
        }
    }

    let pairwise = PairwiseTable::new(matrix.feature_ids().to_vec(), pairs, p_values)?;
    let mins = pairwise.row_mins();

    let summary = if config.degenerate_policy == DegeneratePolicy::SkipFeature {
        let (ids, values): (Vec<String>, Vec<f64>) = matrix
            .feature_ids()
            .iter()
            .zip(&mins)
            .zip(&degenerate)
            .filter(|(_, is_degenerate)| !**is_degenerate)
            .map(|((id, &value), _)| (id.clone(), value))
            .unzip();
        SummaryResult::ranked(VALUE_COLUMN, &ids, &values, SortOrder::Ascending)
    } else {
        SummaryResult::ranked(VALUE_COLUMN, matrix.feature_ids(), &mins, SortOrder::Ascending)
    };
    info!(
        features = summary.len(),
        pairs = pairwise.pairs().len(),
        "ranked features by minimum pairwise p-value"
    );

    Ok(PipelineOutput { pairwise, summary })
}
