//! Command-line interface definitions and run configuration

use crate::viz::PlotStyle;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Smallest accepted number of clusters
pub const MIN_CLUSTERS: usize = 2;
/// Largest accepted number of clusters
pub const MAX_CLUSTERS: usize = 5;

/// The bundled country datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetChoice {
    /// Birth rate and life expectancy in 1953
    #[value(name = "1953")]
    Year1953,
    /// Birth rate and life expectancy in 2008
    #[value(name = "2008")]
    Year2008,
    /// Both years combined
    Both,
}

impl DatasetChoice {
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetChoice::Year1953 => "data1953.csv",
            DatasetChoice::Year2008 => "data2008.csv",
            DatasetChoice::Both => "dataBoth.csv",
        }
    }
}

/// Cluster countries by birth rate and life expectancy using K-Means
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Bundled dataset to cluster
    #[arg(short, long, value_enum, required_unless_present = "input")]
    pub dataset: Option<DatasetChoice>,

    /// Directory holding the bundled dataset files
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Explicit CSV file to cluster, overriding --dataset
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of clusters (2-5)
    #[arg(short = 'k', long, default_value = "3")]
    pub clusters: usize,

    /// Number of iterations to perform
    #[arg(short = 'n', long, default_value = "5")]
    pub iterations: usize,

    /// Seed for centroid initialization; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for the per-iteration scatter plots
    #[arg(long, default_value = "plots")]
    pub plot_dir: PathBuf,

    /// Skip plotting
    #[arg(long)]
    pub no_plot: bool,

    /// Draw plots without title, axes or legend
    #[arg(long)]
    pub plain_plots: bool,

    /// Wait for Enter after each plot before continuing
    #[arg(long)]
    pub pause: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Validated settings for a clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub clusters: usize,
    pub iterations: usize,
    pub seed: Option<u64>,
    /// `None` when plotting is disabled
    pub plot_dir: Option<PathBuf>,
    pub plot_style: PlotStyle,
    pub pause: bool,
}

impl Args {
    /// Validate the arguments and resolve the dataset path
    pub fn into_config(self) -> crate::Result<RunConfig> {
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&self.clusters) {
            anyhow::bail!(
                "Number of clusters must be between {} and {}, got {}",
                MIN_CLUSTERS,
                MAX_CLUSTERS,
                self.clusters
            );
        }

        let input = match (self.input, self.dataset) {
            (Some(path), _) => path,
            (None, Some(choice)) => self.data_dir.join(choice.file_name()),
            (None, None) => anyhow::bail!("Either --dataset or --input must be given"),
        };

        let plot_style = if self.plain_plots {
            PlotStyle::Plain
        } else {
            PlotStyle::Labeled
        };

        Ok(RunConfig {
            input,
            clusters: self.clusters,
            iterations: self.iterations,
            seed: self.seed,
            plot_dir: (!self.no_plot).then_some(self.plot_dir),
            plot_style,
            pause: self.pause,
        })
    }
}
