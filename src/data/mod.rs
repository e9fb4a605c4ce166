//! Input tables and their CSV loaders.

pub mod result;

pub use result::{PairwiseTable, SortOrder, SummaryResult, SummaryRow};

use crate::error::{DeError, Result};
use ndarray::{Array2, ArrayView2};
use std::path::Path;
use tracing::debug;

/// Dense measurement matrix, features × samples.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    values: Array2<f64>,
    /// Feature identifiers (row names)
    feature_ids: Vec<String>,
    /// Sample identifiers (column names)
    sample_ids: Vec<String>,
}

impl ExpressionMatrix {
    pub fn new(
        values: Array2<f64>,
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = values.dim();
        if nrows != feature_ids.len() {
            return Err(DeError::Format(format!(
                "matrix has {} rows but {} feature identifiers",
                nrows,
                feature_ids.len()
            )));
        }
        if ncols != sample_ids.len() {
            return Err(DeError::Format(format!(
                "matrix has {} columns but {} sample identifiers",
                ncols,
                sample_ids.len()
            )));
        }
        Ok(Self {
            values,
            feature_ids,
            sample_ids,
        })
    }

    /// Load a matrix from CSV.
    ///
    /// Expected format:
    /// - First row: header, first cell names the identifier column, the rest are sample IDs
    /// - Subsequent rows: feature ID followed by one value per sample
    ///
    /// Empty cells are read as missing (NaN).
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(DeError::Format(format!(
                "{}: matrix must have an identifier column and at least one sample",
                path.display()
            )));
        }
        let sample_ids: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        let n_samples = sample_ids.len();

        let mut feature_ids = Vec::new();
        let mut data = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != n_samples + 1 {
                return Err(DeError::Format(format!(
                    "{}: row {} has {} fields, expected {}",
                    path.display(),
                    row_idx + 1,
                    record.len(),
                    n_samples + 1
                )));
            }
            feature_ids.push(record[0].to_string());
            for (col_idx, field) in record.iter().skip(1).enumerate() {
                data.push(parse_value(field).ok_or_else(|| {
                    DeError::Format(format!(
                        "{}: non-numeric value '{}' for feature '{}', sample '{}'",
                        path.display(),
                        field,
                        &record[0],
                        sample_ids[col_idx]
                    ))
                })?);
            }
        }

        if feature_ids.is_empty() {
            return Err(DeError::Format(format!("{}: matrix has no features", path.display())));
        }

        let values = Array2::from_shape_vec((feature_ids.len(), n_samples), data)
            .map_err(|e| DeError::Format(e.to_string()))?;
        debug!(
            path = %path.display(),
            features = feature_ids.len(),
            samples = n_samples,
            "loaded expression matrix"
        );

        Self::new(values, feature_ids, sample_ids)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Samples × features view, the layout used when grouping samples.
    pub fn samples_by_features(&self) -> ArrayView2<'_, f64> {
        self.values.t()
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }
}

fn parse_value(field: &str) -> Option<f64> {
    if field.is_empty() {
        return Some(f64::NAN);
    }
    field.parse().ok()
}

/// Integer label, also accepting integral floats such as `2.0`.
fn parse_label(field: &str) -> Option<usize> {
    if let Ok(label) = field.parse::<usize>() {
        return Some(label);
    }
    let value: f64 = field.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
        .then_some(value as usize)
}

/// Class label of every sample, aligned with the matrix columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVector {
    labels: Vec<usize>,
}

impl LabelVector {
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Load labels from CSV: a header row, then one label per sample in the first column.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut labels = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let field = record.get(0).unwrap_or("");
            let label = parse_label(field).ok_or_else(|| {
                DeError::Format(format!(
                    "{}: label '{}' on row {} is not a non-negative integer",
                    path.display(),
                    field,
                    row_idx + 1
                ))
            })?;
            labels.push(label);
        }

        debug!(path = %path.display(), samples = labels.len(), "loaded labels");
        Ok(Self { labels })
    }

    /// Check that there is exactly one label per matrix sample.
    pub fn check_matches(&self, matrix: &ExpressionMatrix) -> Result<()> {
        if self.labels.len() != matrix.n_samples() {
            return Err(DeError::Format(format!(
                "{} labels for {} samples",
                self.labels.len(),
                matrix.n_samples()
            )));
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_matrix_from_csv() {
        let file = write_temp("gene,s1,s2,s3\nA,1,2,3\nB,4.5, ,6\n");
        let matrix = ExpressionMatrix::from_csv(file.path()).unwrap();

        assert_eq!(matrix.feature_ids(), &["A", "B"]);
        assert_eq!(matrix.sample_ids(), &["s1", "s2", "s3"]);
        assert_eq!(matrix.values()[[1, 0]], 4.5);
        assert!(matrix.values()[[1, 1]].is_nan());
        assert_eq!(matrix.samples_by_features().dim(), (3, 2));
        assert_eq!(matrix.samples_by_features()[[2, 0]], 3.0);
    }

    #[test]
    fn test_matrix_non_numeric_is_format_error() {
        let file = write_temp("gene,s1,s2\nA,1,abc\n");
        let err = ExpressionMatrix::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DeError::Format(_)));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_matrix_ragged_row_is_format_error() {
        let file = write_temp("gene,s1,s2\nA,1,2\nB,3\n");
        let err = ExpressionMatrix::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DeError::Format(_)));
    }

    #[test]
    fn test_matrix_without_samples_or_features() {
        let file = write_temp("gene\nA\n");
        assert!(matches!(
            ExpressionMatrix::from_csv(file.path()).unwrap_err(),
            DeError::Format(_)
        ));
        let file = write_temp("gene,s1\n");
        assert!(matches!(
            ExpressionMatrix::from_csv(file.path()).unwrap_err(),
            DeError::Format(_)
        ));
    }

    #[test]
    fn test_labels_from_csv() {
        let file = write_temp("label\n1\n2\n 2 \n");
        let labels = LabelVector::from_csv(file.path()).unwrap();
        assert_eq!(labels.as_slice(), &[1, 2, 2]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_integral_float_labels() {
        let file = write_temp("label\n1.0\n2\n3.00\n");
        let labels = LabelVector::from_csv(file.path()).unwrap();
        assert_eq!(labels.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_bad_label_is_format_error() {
        let file = write_temp("label\n1\ntwo\n");
        assert!(matches!(
            LabelVector::from_csv(file.path()).unwrap_err(),
            DeError::Format(_)
        ));
        let file = write_temp("label\n1\n-2\n");
        assert!(matches!(
            LabelVector::from_csv(file.path()).unwrap_err(),
            DeError::Format(_)
        ));
        let file = write_temp("label\n1\n2.5\n");
        assert!(matches!(
            LabelVector::from_csv(file.path()).unwrap_err(),
            DeError::Format(_)
        ));
    }

    #[test]
    fn test_label_count_mismatch() {
        let matrix = ExpressionMatrix::new(
            Array2::zeros((1, 3)),
            vec!["A".to_string()],
            vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
        )
        .unwrap();
        assert!(LabelVector::new(vec![1, 2, 1]).check_matches(&matrix).is_ok());
        assert!(matches!(
            LabelVector::new(vec![1, 2]).check_matches(&matrix).unwrap_err(),
            DeError::Format(_)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ExpressionMatrix::from_csv("/nonexistent/matrix.csv").unwrap_err();
        assert!(matches!(err, DeError::Csv(_) | DeError::Io(_)));
    }
}
