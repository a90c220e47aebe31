//! WorldCluster: K-Means clustering of countries by birth rate and life expectancy
//!
//! This library runs Lloyd's algorithm for a fixed number of rounds over a
//! two-column country dataset, reporting each round's clusters as text and
//! optionally drawing each round as a scatter plot.

pub mod cli;
pub mod data;
pub mod error;
pub mod geometry;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod viz;

// Re-export public items for easier access
pub use cli::{Args, DatasetChoice, RunConfig};
pub use data::{load_dataset, Dataset};
pub use error::ClusterError;
pub use geometry::{distance, Point};
pub use model::{
    assign, init_centroids, update, ClusterSummary, IterationController, RoundObserver,
    RunOutcome, RunState,
};
pub use viz::{render_round, PlotStyle};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
