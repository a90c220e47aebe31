//! Error types raised by the clustering core

use thiserror::Error;

/// Failures of the clustering core. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Nearest-centroid search needs at least one centroid.
    #[error("Invalid configuration: no centroids to assign points to")]
    EmptyCentroids,

    /// The dataset holds no points.
    #[error("Dataset contains no points")]
    EmptyDataset,

    /// The number of clusters must be at least 1.
    #[error("Invalid configuration: number of clusters must be at least 1, got {0}")]
    InvalidClusterCount(usize),

    /// Names, x values and y values must be index-aligned.
    #[error("Dataset columns differ in length: {names} names, {xs} x values, {ys} y values")]
    ColumnLengthMismatch { names: usize, xs: usize, ys: usize },

    /// The assignment vector must cover every point.
    #[error("Assignment vector has {actual} entries but the dataset has {expected} points")]
    AssignmentLengthMismatch { expected: usize, actual: usize },

    /// Assignment labels must lie in [0, k).
    #[error("Point {index} is assigned to cluster {label}, but only {k} clusters exist")]
    LabelOutOfRange { index: usize, label: usize, k: usize },
}
