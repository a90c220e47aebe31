//! Integration tests for WorldCluster

use approx::assert_relative_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{tempdir, NamedTempFile};
use worldcluster::pipeline::cluster_dataset;
use worldcluster::{
    assign, load_dataset, update, Args, IterationController, Point, PlotStyle, RunConfig,
};

/// Create a test CSV file with the four-country scenario
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Countries,BirthRate,LifeExpectancy").unwrap();
    writeln!(file, "A,1.0,50.0").unwrap();
    writeln!(file, "B,1.1,51.0").unwrap();
    writeln!(file, "C,9.0,20.0").unwrap();
    writeln!(file, "D,9.5,19.0").unwrap();
    file
}

/// A larger file with three well separated groups
fn create_grouped_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Countries,BirthRate,LifeExpectancy").unwrap();
    for i in 0..5 {
        let d = i as f64 * 0.2;
        writeln!(file, "Low{},{},{}", i, 10.0 + d, 80.0 - d).unwrap();
        writeln!(file, "Mid{},{},{}", i, 25.0 + d, 60.0 + d).unwrap();
        writeln!(file, "High{},{},{}", i, 45.0 - d, 40.0 + d).unwrap();
    }
    file
}

fn config(
    input: PathBuf,
    clusters: usize,
    iterations: usize,
    plot_dir: Option<PathBuf>,
) -> RunConfig {
    RunConfig {
        input,
        clusters,
        iterations,
        seed: Some(2024),
        plot_dir,
        plot_style: PlotStyle::Plain,
        pause: false,
    }
}

#[test]
fn test_one_round_from_file() {
    let test_file = create_test_csv();
    let dataset = load_dataset(test_file.path()).unwrap();
    assert_eq!(dataset.len(), 4);

    let initial = vec![Point::new(1.0, 50.0), Point::new(9.5, 19.0)];
    let outcome = IterationController::new(&dataset, initial, 1)
        .run(&mut ())
        .unwrap();

    assert_eq!(outcome.assignment, Some(vec![0, 0, 1, 1]));
    assert_relative_eq!(outcome.centroids[0].x, 1.05);
    assert_relative_eq!(outcome.centroids[0].y, 50.5);
    assert_relative_eq!(outcome.centroids[1].x, 9.25);
    assert_relative_eq!(outcome.centroids[1].y, 19.5);

    assert_eq!(outcome.summaries[0].countries, vec!["A", "B"]);
    assert_eq!(outcome.summaries[1].countries, vec!["C", "D"]);
}

#[test]
fn test_assign_then_update_from_file() {
    let test_file = create_grouped_csv();
    let dataset = load_dataset(test_file.path()).unwrap();

    let centroids = vec![
        Point::new(10.0, 80.0),
        Point::new(25.0, 60.0),
        Point::new(45.0, 40.0),
    ];
    let assignment = assign(&dataset, &centroids).unwrap();
    assert_eq!(assignment.len(), dataset.len());

    let (new_centroids, summaries) = update(&dataset, &assignment, 3).unwrap();
    assert_eq!(new_centroids.len(), 3);
    for summary in &summaries {
        assert_eq!(summary.count, 5);
    }
    assert!(summaries[0].countries.iter().all(|c| c.starts_with("Low")));
    assert!(summaries[1].countries.iter().all(|c| c.starts_with("Mid")));
    assert!(summaries[2].countries.iter().all(|c| c.starts_with("High")));
    assert_relative_eq!(new_centroids[0].x, 10.4, epsilon = 1e-9);
    assert_relative_eq!(new_centroids[0].y, 79.6, epsilon = 1e-9);
}

#[test]
fn test_full_pipeline_with_plots() {
    let test_file = create_grouped_csv();
    let temp_dir = tempdir().unwrap();
    let plot_dir = temp_dir.path().join("plots");

    let dataset = load_dataset(test_file.path()).unwrap();
    let cfg = config(test_file.path().to_path_buf(), 3, 4, Some(plot_dir.clone()));
    let mut report = Vec::new();
    let outcome = cluster_dataset(&dataset, &cfg, &mut report).unwrap();

    assert_eq!(outcome.rounds, 4);
    assert_eq!(outcome.cluster_sizes().iter().sum::<usize>(), dataset.len());
    for round in 1..=4 {
        assert!(plot_dir.join(format!("iteration_{round}.png")).exists());
    }
    assert!(!plot_dir.join("iteration_5.png").exists());

    let report = String::from_utf8(report).unwrap();
    assert_eq!(report.matches("------------------- ITERATION").count(), 4);
    assert_eq!(report.matches("Countries in cluster").count(), 4 * 3);
}

#[test]
fn test_every_label_in_range_for_each_k() {
    let test_file = create_grouped_csv();
    let dataset = load_dataset(test_file.path()).unwrap();

    for k in 2..=5 {
        let cfg = config(test_file.path().to_path_buf(), k, 3, None);
        let outcome = cluster_dataset(&dataset, &cfg, std::io::sink()).unwrap();

        let assignment = outcome.assignment.unwrap();
        assert_eq!(assignment.len(), dataset.len());
        assert!(assignment.iter().all(|&label| label < k));
        assert_eq!(outcome.centroids.len(), k);
    }
}

#[test]
fn test_cli_to_run() {
    let test_file = create_test_csv();
    let input = test_file.path().to_str().unwrap();

    let args = <Args as clap::Parser>::try_parse_from([
        "worldcluster",
        "--input",
        input,
        "-k",
        "2",
        "-n",
        "2",
        "--seed",
        "5",
        "--no-plot",
    ])
    .unwrap();
    let cfg = args.into_config().unwrap();

    let (dataset, outcome) = worldcluster::pipeline::run(&cfg).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(outcome.rounds, 2);
}

#[test]
fn test_error_handling_malformed_dataset() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Countries,BirthRate,LifeExpectancy").unwrap();
    writeln!(file, "A,1.0,fifty").unwrap();

    let cfg = config(file.path().to_path_buf(), 2, 1, None);
    assert!(worldcluster::pipeline::run(&cfg).is_err());
}
