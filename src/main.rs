//! WorldCluster: cluster countries by birth rate and life expectancy
//!
//! Parses the command line, sets up logging, then loads the dataset and runs
//! the configured number of K-Means iterations.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};
use worldcluster::{pipeline, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.into_config()?;
    tracing::debug!(?config, "resolved configuration");

    let start_time = Instant::now();
    let (dataset, outcome) = pipeline::run(&config)?;

    println!("\n=== Run Complete ===");
    println!("Countries: {}", dataset.len());
    println!("Iterations performed: {}", outcome.rounds);
    for (i, (centroid, size)) in outcome
        .centroids
        .iter()
        .zip(outcome.cluster_sizes())
        .enumerate()
    {
        println!("Cluster {}: {} countries, centroid {}", i, size, centroid);
    }
    if let Some(dir) = &config.plot_dir {
        println!("Plots saved to: {}", dir.display());
    }
    tracing::info!(elapsed = ?start_time.elapsed(), "done");

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
