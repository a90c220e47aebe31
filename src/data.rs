//! Country dataset and CSV loading using the `csv` crate

use crate::error::ClusterError;
use crate::geometry::Point;
use anyhow::Context;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Countries and their (birth rate, life expectancy) points, index-aligned
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    points: Vec<Point>,
}

impl Dataset {
    /// Build a dataset from three parallel columns
    pub fn from_columns(
        names: Vec<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> Result<Self, ClusterError> {
        if names.len() != xs.len() || xs.len() != ys.len() {
            return Err(ClusterError::ColumnLengthMismatch {
                names: names.len(),
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        let points = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| Point::new(x, y))
            .collect();

        Ok(Self { names, points })
    }

    /// Build a dataset from `(name, x, y)` rows
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = (S, f64, f64)>) -> Self {
        let (names, points) = rows
            .into_iter()
            .map(|(name, x, y)| (name.into(), Point::new(x, y)))
            .unzip();
        Self { names, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

/// Load a `country,birth_rate,life_expectancy` CSV file
///
/// The header row is discarded and the remaining rows are read in file order.
/// Columns beyond the third are ignored.
///
/// # Errors
/// * The file cannot be opened or is not valid CSV
/// * A row is missing a field or has a non-numeric or non-finite value (row numbers are 1-based,
///   header excluded)
/// * The file has no data rows
pub fn load_dataset(path: impl AsRef<Path>) -> crate::Result<Dataset> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading dataset");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let mut names = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let row = row + 1;
        let record = result.with_context(|| format!("Malformed CSV at data row {row}"))?;

        let name = record
            .get(0)
            .with_context(|| format!("Missing country name at data row {row}"))?;
        let x = parse_field(record.get(1), "birth rate", row)?;
        let y = parse_field(record.get(2), "life expectancy", row)?;

        names.push(name.to_string());
        xs.push(x);
        ys.push(y);
    }

    if names.is_empty() {
        anyhow::bail!("No data rows found in {}", path.display());
    }

    debug!(rows = names.len(), "parsed dataset rows");
    Ok(Dataset::from_columns(names, xs, ys)?)
}

fn parse_field(field: Option<&str>, what: &str, row: usize) -> crate::Result<f64> {
    let raw = field.with_context(|| format!("Missing {what} at data row {row}"))?;
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("Invalid {what} '{raw}' at data row {row}"))?;
    if !value.is_finite() {
        anyhow::bail!("Invalid {what} '{raw}' at data row {row}");
    }
    Ok(value)
}
