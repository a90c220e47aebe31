//! Per-round scatter plots of the clustering using Plotters

use crate::data::Dataset;
use crate::geometry::Point;
use crate::model::RoundObserver;
use anyhow::Context;
use plotters::prelude::*;
use std::io::{self, BufRead, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

/// How much chrome a plot carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotStyle {
    /// Title, axis descriptions, tick labels and a legend
    #[default]
    Labeled,
    /// Points and centroid markers only. Draws no text, so no system fonts are needed.
    Plain,
}

/// Color for a cluster index. The palette cycles, so any `k` gets a color.
fn cluster_color(cluster: usize) -> RGBAColor {
    Palette99::pick(cluster).to_rgba()
}

/// Axis range covering `values` with a margin on each side
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad)..(max + pad)
}

/// Draw a scatter plot of one round's assignment
///
/// # Arguments
/// * `dataset` - Points being clustered
/// * `centroids` - Centroids that produced `assignment`, drawn as black crosses
/// * `assignment` - Cluster index per point, used to color it
/// * `round` - Round number shown in the title
/// * `output_path` - Path of the PNG to write
/// * `style` - Whether to draw title, axes and legend
pub fn render_round(
    dataset: &Dataset,
    centroids: &[Point],
    assignment: &[usize],
    round: usize,
    output_path: &Path,
    style: PlotStyle,
) -> crate::Result<()> {
    let points = dataset.points();
    let x_range = padded_range(points.iter().chain(centroids).map(|p| p.x));
    let y_range = padded_range(points.iter().chain(centroids).map(|p| p.y));

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let labeled = style == PlotStyle::Labeled;
    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if labeled {
        builder
            .caption(format!("Iteration {round}"), ("sans-serif", 30))
            .x_label_area_size(50)
            .y_label_area_size(60);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    if labeled {
        chart
            .configure_mesh()
            .x_desc("Birth Rate")
            .y_desc("Life Expectancy")
            .axis_desc_style(("sans-serif", 15))
            .draw()?;
    }

    for cluster in 0..centroids.len() {
        let color = cluster_color(cluster);
        let members = points
            .iter()
            .zip(assignment)
            .filter(move |(_, label)| **label == cluster)
            .map(move |(p, _)| Circle::new((p.x, p.y), 4, color.filled()));

        chart
            .draw_series(members)?
            .label(format!("Cluster {cluster}"))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart.draw_series(
        centroids
            .iter()
            .map(|c| Cross::new((c.x, c.y), 8, BLACK.stroke_width(2))),
    )?;

    if labeled {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Writes `iteration_{round}.png` into a directory after each assignment
///
/// With `pause` set, blocks on stdin after each plot until Enter is pressed,
/// so the plot can be inspected before the run continues.
pub struct PlotObserver {
    dir: PathBuf,
    style: PlotStyle,
    pause: bool,
}

impl PlotObserver {
    /// Create the observer, creating `dir` if it does not exist
    pub fn new(dir: impl Into<PathBuf>, style: PlotStyle, pause: bool) -> crate::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;
        Ok(Self { dir, style, pause })
    }

    pub fn plot_path(&self, round: usize) -> PathBuf {
        self.dir.join(format!("iteration_{round}.png"))
    }

    fn wait_for_viewer(&self, path: &Path) -> crate::Result<()> {
        print!("Plot saved to {}. Press Enter to continue...", path.display());
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

impl RoundObserver for PlotObserver {
    fn on_assignment(
        &mut self,
        round: usize,
        dataset: &Dataset,
        centroids: &[Point],
        assignment: &[usize],
    ) -> crate::Result<()> {
        let path = self.plot_path(round);
        render_round(dataset, centroids, assignment, round, &path, self.style)
            .with_context(|| format!("Failed to render plot {}", path.display()))?;
        info!(round, path = %path.display(), "plot written");

        if self.pause {
            self.wait_for_viewer(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_dataset() -> Dataset {
        Dataset::from_rows([
            ("A", 1.0, 50.0),
            ("B", 1.1, 51.0),
            ("C", 9.0, 20.0),
            ("D", 9.5, 19.0),
        ])
    }

    #[test]
    fn test_padded_range() {
        let range = padded_range([0.0, 100.0].into_iter());
        assert_eq!(range, -5.0..105.0);

        let range = padded_range([3.0, 3.0].into_iter());
        assert_eq!(range, 2.0..4.0);

        let range = padded_range(std::iter::empty());
        assert_eq!(range, 0.0..1.0);
    }

    #[test]
    fn test_cluster_colors_distinct_for_small_k() {
        let colors: Vec<_> = (0..5).map(|c| cluster_color(c).rgb()).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn test_render_round_writes_png() {
        let dataset = create_test_dataset();
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("round.png");

        let centroids = [Point::new(1.0, 50.0), Point::new(9.5, 19.0)];
        render_round(
            &dataset,
            &centroids,
            &[0, 0, 1, 1],
            1,
            &output_path,
            PlotStyle::Plain,
        )
        .unwrap();

        assert!(output_path.exists());
    }

    #[test]
    fn test_render_round_with_empty_cluster_at_origin() {
        let dataset = create_test_dataset();
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("round.png");

        let centroids = [Point::new(5.0, 35.0), Point::origin(), Point::origin()];
        render_round(
            &dataset,
            &centroids,
            &[0, 0, 0, 0],
            2,
            &output_path,
            PlotStyle::Plain,
        )
        .unwrap();

        assert!(output_path.exists());
    }

    #[test]
    fn test_plot_observer_names_files_by_round() {
        let dataset = create_test_dataset();
        let temp_dir = tempdir().unwrap();
        let plot_dir = temp_dir.path().join("plots");
        let mut observer = PlotObserver::new(&plot_dir, PlotStyle::Plain, false).unwrap();

        let centroids = [Point::new(1.0, 50.0), Point::new(9.5, 19.0)];
        observer
            .on_assignment(3, &dataset, &centroids, &[0, 0, 1, 1])
            .unwrap();

        assert!(plot_dir.join("iteration_3.png").exists());
    }
}
