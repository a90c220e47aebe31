//! Human-readable cluster reports written after each centroid update

use crate::data::Dataset;
use crate::geometry::Point;
use crate::model::{ClusterSummary, RoundObserver};
use std::io::Write;

/// Render one cluster's summary as text
pub fn format_summary(summary: &ClusterSummary) -> String {
    let c = summary.index;
    format!(
        "Countries in cluster '{c}':\n\
         [{countries}]\n\
         There are {n} countries in cluster '{c}'\n\
         The mean Birth Rate of cluster '{c}' is {x:.2}\n\
         The mean Life Expectancy of cluster '{c}' is {y:.2}\n",
        countries = quoted_list(&summary.countries),
        n = summary.count,
        x = summary.mean.x,
        y = summary.mean.y,
    )
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Banner printed at the start of each round's output
pub fn format_banner(round: usize) -> String {
    format!("------------------- ITERATION {round} -------------------")
}

/// Writes the round banner and per-cluster summaries to a text sink
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RoundObserver for ConsoleReporter<W> {
    fn on_assignment(
        &mut self,
        round: usize,
        _dataset: &Dataset,
        _centroids: &[Point],
        _assignment: &[usize],
    ) -> crate::Result<()> {
        writeln!(self.out, "{}", format_banner(round))?;
        Ok(())
    }

    fn on_update(&mut self, _round: usize, summaries: &[ClusterSummary]) -> crate::Result<()> {
        for summary in summaries {
            writeln!(self.out)?;
            write!(self.out, "{}", format_summary(summary))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(index: usize, countries: &[&str], mean: Point) -> ClusterSummary {
        ClusterSummary {
            index,
            countries: countries.iter().map(|c| c.to_string()).collect(),
            count: countries.len(),
            mean,
        }
    }

    #[test]
    fn test_format_summary() {
        let text = format_summary(&summary(1, &["Chad", "Mali"], Point::new(46.458, 48.0)));

        assert!(text.contains("Countries in cluster '1':\n['Chad', 'Mali']\n"));
        assert!(text.contains("There are 2 countries in cluster '1'"));
        assert!(text.contains("The mean Birth Rate of cluster '1' is 46.46"));
        assert!(text.contains("The mean Life Expectancy of cluster '1' is 48.00"));
    }

    #[test]
    fn test_format_empty_cluster() {
        let text = format_summary(&summary(3, &[], Point::origin()));

        assert!(text.contains("[]"));
        assert!(text.contains("There are 0 countries in cluster '3'"));
        assert!(text.contains("is 0.00"));
    }

    #[test]
    fn test_console_reporter_writes_every_cluster() {
        let dataset = Dataset::from_rows([("A", 1.0, 50.0)]);
        let mut reporter = ConsoleReporter::new(Vec::new());

        reporter
            .on_assignment(2, &dataset, &[Point::new(1.0, 50.0)], &[0])
            .unwrap();
        reporter
            .on_update(
                2,
                &[
                    summary(0, &["A"], Point::new(1.0, 50.0)),
                    summary(1, &[], Point::origin()),
                ],
            )
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.starts_with("------------------- ITERATION 2 -------------------\n"));
        assert!(output.contains("Countries in cluster '0':\n['A']"));
        assert!(output.contains("There are 0 countries in cluster '1'"));
    }
}
