//! End-to-end run: load, initialize, iterate with plotting and reporting

use crate::cli::RunConfig;
use crate::data::{load_dataset, Dataset};
use crate::geometry::Point;
use crate::model::{init_centroids, ClusterSummary, IterationController, RoundObserver, RunOutcome};
use crate::report::ConsoleReporter;
use crate::viz::PlotObserver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tracing::info;

/// Reports and plots each round in the order the round produces them
///
/// The round banner is written first, then the plot, then the cluster summaries.
pub struct PipelineObserver<W: Write> {
    reporter: ConsoleReporter<W>,
    plotter: Option<PlotObserver>,
}

impl<W: Write> PipelineObserver<W> {
    pub fn new(reporter: ConsoleReporter<W>, plotter: Option<PlotObserver>) -> Self {
        Self { reporter, plotter }
    }

    pub fn into_reporter(self) -> ConsoleReporter<W> {
        self.reporter
    }
}

impl<W: Write> RoundObserver for PipelineObserver<W> {
    fn on_assignment(
        &mut self,
        round: usize,
        dataset: &Dataset,
        centroids: &[Point],
        assignment: &[usize],
    ) -> crate::Result<()> {
        self.reporter
            .on_assignment(round, dataset, centroids, assignment)?;
        if let Some(plotter) = self.plotter.as_mut() {
            plotter.on_assignment(round, dataset, centroids, assignment)?;
        }
        Ok(())
    }

    fn on_update(&mut self, round: usize, summaries: &[ClusterSummary]) -> crate::Result<()> {
        self.reporter.on_update(round, summaries)
    }
}

/// Seeded RNG when a seed is given, entropy-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Cluster an already loaded dataset, writing reports to `out`
pub fn cluster_dataset<W: Write>(
    dataset: &Dataset,
    config: &RunConfig,
    out: W,
) -> crate::Result<RunOutcome> {
    let mut rng = make_rng(config.seed);
    let initial = init_centroids(dataset, config.clusters, &mut rng)?;
    info!(k = config.clusters, iterations = config.iterations, "running k-means");

    let plotter = match &config.plot_dir {
        Some(dir) => Some(PlotObserver::new(dir, config.plot_style, config.pause)?),
        None => None,
    };
    let mut observer = PipelineObserver::new(ConsoleReporter::new(out), plotter);

    IterationController::new(dataset, initial, config.iterations).run(&mut observer)
}

/// Load the configured dataset and cluster it, reporting to stdout
pub fn run(config: &RunConfig) -> crate::Result<(Dataset, RunOutcome)> {
    let dataset = load_dataset(&config.input)?;
    info!(countries = dataset.len(), "dataset loaded");
    let outcome = cluster_dataset(&dataset, config, std::io::stdout())?;
    Ok((dataset, outcome))
}
