//! Error types shared by the loader, the engines and the writer.

use crate::testing::utils::ClassPair;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed or mismatched input files.
    #[error("Format error: {0}")]
    Format(String),

    /// A declared class has no samples, so its median / group is undefined.
    #[error("Class {class} of 1..={classes} has no samples")]
    ClassImbalance { class: usize, classes: usize },

    /// A pairwise test could not be computed and the policy is to fail the run.
    #[error("Degenerate Mann-Whitney test for feature '{feature}', classes {pair}")]
    StatisticalDegenerate { feature: String, pair: ClassPair },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, DeError>;
