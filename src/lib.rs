//! # pairwise-de
//!
//! Multi-class differential expression summaries for a features × samples matrix.
//!
//! Every unordered pair of classes `1..=classes` is compared feature by feature and the
//! per-pair statistics are reduced to one value per feature for ranking:
//!
//! - **Fold change** ([`pipeline::run_fold_change`]): mean over pairs of the absolute
//!   log2 ratio of pseudo-counted class medians, ranked largest first.
//! - **Significance** ([`pipeline::run_significance`]): minimum over pairs of the
//!   two-sided Mann-Whitney U p-value, ranked smallest first.
//!
//! ## Module Organization
//!
//! - **[`data`]**: CSV loaders for the matrix and labels, derived tables and the writer
//! - **[`testing`]**: Class grouping, the Mann-Whitney U test and fold-change effects
//! - **[`pipeline`]**: Configuration and the two ranking pipelines
//! - **[`error`]**: The error taxonomy shared by everything above

pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod testing;
