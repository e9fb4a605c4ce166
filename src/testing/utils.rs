use crate::error::{DeError, Result};
use single_utilities::traits::FloatOps;
use std::cmp::Ordering;
use std::fmt;

/// An unordered pair of class labels, always stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassPair {
    pub first: usize,
    pub second: usize,
}

impl ClassPair {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            ClassPair { first: a, second: b }
        } else {
            ClassPair { first: b, second: a }
        }
    }

    /// Column name used for this pair in the pairwise table.
    pub fn key(&self) -> String {
        format!("{}_vs_{}", self.first, self.second)
    }
}

impl fmt::Display for ClassPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// All unordered pairs of `1..=classes`, outer class ascending, inner class ascending.
pub fn class_pairs(classes: usize) -> Vec<ClassPair> {
    let mut pairs = Vec::with_capacity(pair_count(classes));
    for i in 1..=classes {
        for j in (i + 1)..=classes {
            pairs.push(ClassPair { first: i, second: j });
        }
    }
    pairs
}

pub fn pair_count(classes: usize) -> usize {
    classes * classes.saturating_sub(1) / 2
}

/// Sample column indices partitioned by class label `1..=classes`.
#[derive(Debug, Clone)]
pub struct ClassGroups {
    groups: Vec<Vec<usize>>,
    excluded: Vec<usize>,
}

impl ClassGroups {
    /// Partition sample positions by label. Every class in `1..=classes` must
    /// have at least one member; labels outside that range are collected as
    /// excluded samples.
    pub fn from_labels(labels: &[usize], classes: usize) -> Result<Self> {
        let mut groups = vec![Vec::new(); classes];
        let mut excluded = Vec::new();

        for (sample, &label) in labels.iter().enumerate() {
            if (1..=classes).contains(&label) {
                groups[label - 1].push(sample);
            } else {
                excluded.push(sample);
            }
        }

        if let Some(empty) = groups.iter().position(|g| g.is_empty()) {
            return Err(DeError::ClassImbalance {
                class: empty + 1,
                classes,
            });
        }

        Ok(ClassGroups { groups, excluded })
    }

    pub fn classes(&self) -> usize {
        self.groups.len()
    }

    /// Sample indices of `class` (1-based), `None` outside `1..=classes`.
    pub fn indices(&self, class: usize) -> Option<&[usize]> {
        class
            .checked_sub(1)
            .and_then(|idx| self.groups.get(idx))
            .map(Vec::as_slice)
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Samples whose label is outside `1..=classes`.
    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }
}

/// Median ignoring NaN values. Returns NaN when nothing is left.
pub fn median<T>(values: &[T]) -> T
where
    T: FloatOps,
{
    let mut sorted: Vec<T> = values
        .iter()
        .copied()
        .filter(|&v| !num_traits::Float::is_nan(v))
        .collect();
    if sorted.is_empty() {
        return <T as num_traits::Float>::nan();
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / (T::one() + T::one())
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_class_pairs_order_and_count() {
        let pairs = class_pairs(4);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pair_count(4), 6);
        let keys: Vec<_> = pairs.iter().map(|p| p.key()).collect();
        assert_eq!(
            keys,
            vec!["1_vs_2", "1_vs_3", "1_vs_4", "2_vs_3", "2_vs_4", "3_vs_4"]
        );
    }

    #[test]
    fn test_class_pairs_no_collision_past_nine() {
        let pairs = class_pairs(12);
        let mut keys: Vec<_> = pairs.iter().map(|p| p.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 66);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(0), 0);
    }

    #[test]
    fn test_class_pair_is_unordered() {
        assert_eq!(ClassPair::new(3, 1), ClassPair::new(1, 3));
        assert_eq!(ClassPair::new(3, 1).to_string(), "(1, 3)");
    }

    #[test]
    fn test_groups_from_labels() {
        let groups = ClassGroups::from_labels(&[2, 1, 2, 3, 1, 5], 3).unwrap();
        assert_eq!(groups.indices(1), Some(&[1, 4][..]));
        assert_eq!(groups.indices(2), Some(&[0, 2][..]));
        assert_eq!(groups.indices(3), Some(&[3][..]));
        assert_eq!(groups.excluded(), &[5]);
        assert_eq!(groups.sizes(), vec![2, 2, 1]);
    }

    #[test]
    fn test_indices_outside_class_range() {
        let groups = ClassGroups::from_labels(&[1, 2], 2).unwrap();
        assert_eq!(groups.indices(0), None);
        assert_eq!(groups.indices(3), None);
    }

    #[test]
    fn test_missing_class_is_imbalance() {
        let err = ClassGroups::from_labels(&[1, 1, 2, 2], 3).unwrap_err();
        match err {
            DeError::ClassImbalance { class, classes } => {
                assert_eq!(class, 3);
                assert_eq!(classes, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_median() {
        assert_abs_diff_eq!(median::<f64>(&[3.0, 1.0, 2.0]), 2.0);
        assert_abs_diff_eq!(median::<f64>(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_abs_diff_eq!(median::<f64>(&[f64::NAN, 5.0, 7.0]), 6.0);
        assert!(median::<f64>(&[f64::NAN]).is_nan());
        assert!(median::<f64>(&[]).is_nan());
    }
}
