//! K-Means clustering engine: initialization, assignment, centroid update and the round loop

use crate::data::Dataset;
use crate::error::ClusterError;
use crate::geometry::{distance, Point};
use rand::Rng;
use tracing::{debug, info, trace};

/// Per-cluster statistics produced by a centroid update
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// Cluster identifier (index into the centroid set)
    pub index: usize,
    /// Names of the member countries, in dataset order
    pub countries: Vec<String>,
    /// Number of member points
    pub count: usize,
    /// Mean member point, or the origin for an empty cluster
    pub mean: Point,
}

/// Pick `k` initial centroids by sampling dataset points uniformly with replacement
///
/// Two centroids may start on the same point; no attempt is made to spread them out.
pub fn init_centroids<R: Rng + ?Sized>(
    dataset: &Dataset,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Point>, ClusterError> {
    if dataset.is_empty() {
        return Err(ClusterError::EmptyDataset);
    }
    if k == 0 {
        return Err(ClusterError::InvalidClusterCount(k));
    }

    let points = dataset.points();
    let centroids: Vec<Point> = (0..k)
        .map(|_| points[rng.gen_range(0..points.len())])
        .collect();

    debug!(?centroids, "initialized centroids");
    Ok(centroids)
}

/// Label every point with the index of its nearest centroid
///
/// Ties go to the lowest centroid index.
pub fn assign(dataset: &Dataset, centroids: &[Point]) -> Result<Vec<usize>, ClusterError> {
    if centroids.is_empty() {
        return Err(ClusterError::EmptyCentroids);
    }

    let assignment = dataset
        .points()
        .iter()
        .map(|point| nearest_centroid(point, centroids))
        .collect();

    Ok(assignment)
}

fn nearest_centroid(point: &Point, centroids: &[Point]) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest = 0;

    for (index, centroid) in centroids.iter().enumerate() {
        let d = distance(point, centroid);
        if d < min_distance {
            min_distance = d;
            closest = index;
        }
    }

    closest
}

/// Recompute each centroid as the mean of its assigned points
///
/// A cluster that received no points gets the origin `(0.0, 0.0)` as its new
/// centroid, and that position is what the next round measures against.
pub fn update(
    dataset: &Dataset,
    assignment: &[usize],
    k: usize,
) -> Result<(Vec<Point>, Vec<ClusterSummary>), ClusterError> {
    if k == 0 {
        return Err(ClusterError::InvalidClusterCount(k));
    }
    if assignment.len() != dataset.len() {
        return Err(ClusterError::AssignmentLengthMismatch {
            expected: dataset.len(),
            actual: assignment.len(),
        });
    }

    let mut sums = vec![(0.0_f64, 0.0_f64); k];
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];

    for (index, (&label, point)) in assignment.iter().zip(dataset.points()).enumerate() {
        if label >= k {
            return Err(ClusterError::LabelOutOfRange { index, label, k });
        }
        sums[label].0 += point.x;
        sums[label].1 += point.y;
        members[label].push(index);
    }

    let summaries: Vec<ClusterSummary> = members
        .into_iter()
        .zip(sums)
        .enumerate()
        .map(|(cluster, (indices, (sum_x, sum_y)))| {
            let count = indices.len();
            let mean = if count == 0 {
                Point::origin()
            } else {
                Point::new(sum_x / count as f64, sum_y / count as f64)
            };
            let countries = indices
                .iter()
                .map(|&i| dataset.names()[i].clone())
                .collect();

            ClusterSummary {
                index: cluster,
                countries,
                count,
                mean,
            }
        })
        .collect();

    let centroids = summaries.iter().map(|summary| summary.mean).collect();
    Ok((centroids, summaries))
}

/// Side-effect hooks invoked by [`IterationController`] each round
///
/// Hooks may block (for example until a plot is dismissed); the controller
/// waits for them before continuing. An error returned from a hook aborts the run.
pub trait RoundObserver {
    /// Called after the assignment step with the centroids that produced it
    fn on_assignment(
        &mut self,
        _round: usize,
        _dataset: &Dataset,
        _centroids: &[Point],
        _assignment: &[usize],
    ) -> crate::Result<()> {
        Ok(())
    }

    /// Called after the update step with the per-cluster summaries
    fn on_update(&mut self, _round: usize, _summaries: &[ClusterSummary]) -> crate::Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
impl RoundObserver for () {}

/// Where the controller is in its fixed sequence of rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Centroids set, no round performed yet
    Initialized,
    /// The given round (1-based) has completed and more remain
    Iterating(usize),
    /// Every requested round has completed
    Done,
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Centroids the run started from
    pub initial_centroids: Vec<Point>,
    /// Centroids after the last round
    pub centroids: Vec<Point>,
    /// Assignment computed in the last round, if any round ran
    pub assignment: Option<Vec<usize>>,
    /// Summaries from the last round, empty if no round ran
    pub summaries: Vec<ClusterSummary>,
    /// Number of rounds performed
    pub rounds: usize,
}

impl RunOutcome {
    /// Number of points in each cluster after the last round
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        if let Some(assignment) = &self.assignment {
            for &label in assignment {
                if label < sizes.len() {
                    sizes[label] += 1;
                }
            }
        }
        sizes
    }
}

/// Runs Lloyd's algorithm for a fixed number of rounds
///
/// Each round assigns points to the current centroids, reports the assignment,
/// recomputes the centroids, reports the summaries and replaces the centroid
/// set. There is no convergence check: exactly `iterations` rounds are run.
#[derive(Debug)]
pub struct IterationController<'a> {
    dataset: &'a Dataset,
    initial_centroids: Vec<Point>,
    centroids: Vec<Point>,
    assignment: Option<Vec<usize>>,
    summaries: Vec<ClusterSummary>,
    iterations: usize,
    round: usize,
}

impl<'a> IterationController<'a> {
    /// `k` is taken from the number of initial centroids
    pub fn new(dataset: &'a Dataset, initial_centroids: Vec<Point>, iterations: usize) -> Self {
        Self {
            dataset,
            centroids: initial_centroids.clone(),
            initial_centroids,
            assignment: None,
            summaries: Vec::new(),
            iterations,
            round: 0,
        }
    }

    pub fn k(&self) -> usize {
        self.initial_centroids.len()
    }

    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    pub fn state(&self) -> RunState {
        if self.round >= self.iterations {
            RunState::Done
        } else if self.round == 0 {
            RunState::Initialized
        } else {
            RunState::Iterating(self.round)
        }
    }

    /// Perform the next round. Returns `false` without doing anything once done.
    pub fn step<O: RoundObserver + ?Sized>(&mut self, observer: &mut O) -> crate::Result<bool> {
        if self.state() == RunState::Done {
            return Ok(false);
        }

        let round = self.round + 1;
        info!(round, total = self.iterations, "starting iteration");

        let assignment = assign(self.dataset, &self.centroids)?;
        trace!(?assignment, "assigned points");
        observer.on_assignment(round, self.dataset, &self.centroids, &assignment)?;

        let (centroids, summaries) = update(self.dataset, &assignment, self.k())?;
        observer.on_update(round, &summaries)?;

        for summary in summaries.iter().filter(|summary| summary.count == 0) {
            debug!(cluster = summary.index, "empty cluster, centroid reset to origin");
        }
        debug!(?centroids, "updated centroids");

        self.centroids = centroids;
        self.assignment = Some(assignment);
        self.summaries = summaries;
        self.round = round;
        Ok(true)
    }

    /// Perform every remaining round and hand back the final state
    pub fn run<O: RoundObserver + ?Sized>(mut self, observer: &mut O) -> crate::Result<RunOutcome> {
        while self.step(observer)? {}

        info!(rounds = self.round, "clustering finished");
        Ok(RunOutcome {
            initial_centroids: self.initial_centroids,
            centroids: self.centroids,
            assignment: self.assignment,
            summaries: self.summaries,
            rounds: self.round,
        })
    }
}
