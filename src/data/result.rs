//! Derived tables and the CSV writer.

use crate::error::{DeError, Result};
use crate::testing::utils::ClassPair;
use ndarray::Array2;
use std::cmp::Ordering;
use std::path::Path;

/// One value per feature and class pair, features × pairs.
#[derive(Debug, Clone)]
pub struct PairwiseTable {
    feature_ids: Vec<String>,
    pairs: Vec<ClassPair>,
    values: Array2<f64>,
}

impl PairwiseTable {
    pub fn new(
        feature_ids: Vec<String>,
        pairs: Vec<ClassPair>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if values.dim() != (feature_ids.len(), pairs.len()) {
            return Err(DeError::InvalidParameter(format!(
                "pairwise values are {:?}, expected ({}, {})",
                values.dim(),
                feature_ids.len(),
                pairs.len()
            )));
        }
        Ok(Self {
            feature_ids,
            pairs,
            values,
        })
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn pairs(&self) -> &[ClassPair] {
        &self.pairs
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Value for `feature` (row index) and `pair`, if the pair is in the table.
    pub fn get(&self, feature: usize, pair: ClassPair) -> Option<f64> {
        let col = self.pairs.iter().position(|&p| p == pair)?;
        self.values.get((feature, col)).copied()
    }

    /// Mean of every feature's row, skipping NaN.
    pub fn row_means(&self) -> Vec<f64> {
        self.values
            .rows()
            .into_iter()
            .map(|row| {
                let (sum, count) = row
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
                if count == 0 { f64::NAN } else { sum / count as f64 }
            })
            .collect()
    }

    /// Minimum of every feature's row, skipping NaN.
    pub fn row_mins(&self) -> Vec<f64> {
        self.values
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .copied()
                    .filter(|v| !v.is_nan())
                    .fold(f64::NAN, |acc, v| if acc.is_nan() || v < acc { v } else { acc })
            })
            .collect()
    }

    /// Write the table with a `targetid` column and one `<i>_vs_<j>` column per pair.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["targetid".to_string()];
        header.extend(self.pairs.iter().map(ClassPair::key));
        writer.write_record(&header)?;

        for (feature_id, row) in self.feature_ids.iter().zip(self.values.rows()) {
            let mut record = vec![feature_id.clone()];
            record.extend(row.iter().map(|&v| format_value(v)));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub feature_id: String,
    pub value: f64,
}

/// Final ranking: one summary value per feature.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    value_column: String,
    rows: Vec<SummaryRow>,
}

impl SummaryResult {
    /// Pair every feature with its value and sort; NaN values go last.
    pub fn ranked(
        value_column: &str,
        feature_ids: &[String],
        values: &[f64],
        order: SortOrder,
    ) -> Self {
        let mut rows: Vec<SummaryRow> = feature_ids
            .iter()
            .zip(values)
            .map(|(id, &value)| SummaryRow {
                feature_id: id.clone(),
                value,
            })
            .collect();

        rows.sort_by(|a, b| compare_nan_last(a.value, b.value, order));

        Self {
            value_column: value_column.to_string(),
            rows,
        }
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write `targetid,<value_column>` followed by one row per feature.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["targetid", self.value_column.as_str()])?;
        for row in &self.rows {
            writer.write_record([row.feature_id.as_str(), format_value(row.value).as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn compare_nan_last(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match order {
            SortOrder::Ascending => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            SortOrder::Descending => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        },
    }
}

/// Missing values are written as empty fields. Magnitudes below `1e-4` or from
/// `1e16` up use exponent notation.
fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_nan() {
        String::new()
    } else if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        value.to_string()
    }
}
