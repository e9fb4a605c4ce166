use crate::testing::utils::{median, ClassGroups, ClassPair};
use ndarray::{Array2, ArrayView2};
use num_traits::Float;
use single_utilities::traits::FloatOps;

/// Median of every feature within every class.
///
/// `matrix` is features × samples; the result is features × classes, column
/// `c` holding class `c + 1`.
pub fn class_median_profile<T>(matrix: ArrayView2<'_, T>, groups: &ClassGroups) -> Array2<T>
where
    T: FloatOps,
{
    let n_features = matrix.nrows();
    let classes = groups.classes();

    Array2::from_shape_fn((n_features, classes), |(feature, col)| {
        let values: Vec<T> = groups
            .indices(col + 1)
            .unwrap_or(&[])
            .iter()
            .map(|&sample| matrix[[feature, sample]])
            .collect();
        median(&values)
    })
}

/// `|log2((a + pseudo_count) / (b + pseudo_count))|`
///
/// Symmetric in `a` and `b`, and exactly zero when they are equal.
pub fn abs_log2_fold_change<T>(a: T, b: T, pseudo_count: T) -> T
where
    T: FloatOps,
{
    Float::abs(Float::log2((a + pseudo_count) / (b + pseudo_count)))
}

/// Pairwise magnitudes for every feature, features × pairs, in the order of `pairs`.
pub fn pairwise_fold_changes<T>(
    medians: ArrayView2<'_, T>,
    pairs: &[ClassPair],
    pseudo_count: T,
) -> Array2<T>
where
    T: FloatOps,
{
    Array2::from_shape_fn((medians.nrows(), pairs.len()), |(feature, p)| {
        let pair = pairs[p];
        abs_log2_fold_change(
            medians[[feature, pair.first - 1]],
            medians[[feature, pair.second - 1]],
            pseudo_count,
        )
    })
}
