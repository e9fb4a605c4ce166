use crate::error::Result;
use crate::testing::effect;
use crate::testing::utils::ClassGroups;
use crate::testing::{Alternative, TestResult};
use ndarray::Array2;
use single_utilities::traits::FloatOps;

pub mod nonparametric;

/// Statistics over a dense features × samples matrix.
pub trait MatrixStatTests<T>
where
    T: FloatOps,
{
    fn mann_whitney_test(
        &self,
        group1_indices: &[usize],
        group2_indices: &[usize],
        alternative: Alternative,
    ) -> Result<Vec<TestResult<T>>>;

    /// Per-feature median of every class, features × classes.
    fn class_medians(&self, groups: &ClassGroups) -> Array2<T>;
}

impl<T> MatrixStatTests<T> for Array2<T>
where
    T: FloatOps,
{
    fn mann_whitney_test(
        &self,
        group1_indices: &[usize],
        group2_indices: &[usize],
        alternative: Alternative,
    ) -> Result<Vec<TestResult<T>>> {
        nonparametric::mann_whitney_matrix_groups(
            self.view(),
            group1_indices,
            group2_indices,
            alternative,
        )
    }

    fn class_medians(&self, groups: &ClassGroups) -> Array2<T> {
        effect::class_median_profile(self.view(), groups)
    }
}
