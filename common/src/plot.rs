use core::fmt::Debug;
use std::{fs, path::Path};

use eyre::{Result, bail};
use tracing::debug;

use crate::{config::ChartStyle, metrics::MetricSeries, record::ResultRecord};

pub trait Plot: Debug {
    fn name(&self) -> &'static str;
    /// Fails when the drawing backend cannot render with `style`, ie. the
    /// configured font cannot be resolved
    fn check_backend(&self, style: &ChartStyle) -> Result<()>;
    /// Plots the data
    ///
    /// Arguments:
    /// * `labels` - One x-axis label per entry of `series`, ie. `v2.13`
    /// * `series` - The extracted metrics, index-aligned with `labels`
    /// * `output` - The image file to write
    /// * `style` - Presentation settings
    fn plot(
        &self,
        labels: &[String],
        series: &MetricSeries,
        output: &Path,
        style: &ChartStyle,
    ) -> Result<()>;
}

pub fn version_labels(records: &[ResultRecord]) -> Vec<String> {
    records.iter().map(ResultRecord::label).collect()
}

pub fn ensure_parent_dir(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Runs every plot over the same data. An empty series is not plotted.
pub fn plot(
    plots: &[Box<dyn Plot>],
    labels: &[String],
    series: &MetricSeries,
    output: &Path,
    style: &ChartStyle,
) -> Result<()> {
    if series.is_empty() {
        debug!("No data, skipping plots");
        return Ok(());
    }
    if labels.len() != series.len() {
        bail!(
            "Got {} labels for {} data points",
            labels.len(),
            series.len()
        );
    }

    ensure_parent_dir(output)?;
    for plot in plots {
        debug!("Rendering {}", plot.name());
        plot.plot(labels, series, output, style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::extract_metrics;
    use serde_json::{Map, json};
    use std::{cell::Cell, rc::Rc};
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct CountingPlot {
        calls: Rc<Cell<usize>>,
    }

    impl Plot for CountingPlot {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn check_backend(&self, _style: &ChartStyle) -> Result<()> {
            Ok(())
        }

        fn plot(&self, _: &[String], _: &MetricSeries, _: &Path, _: &ChartStyle) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn counting() -> (Rc<Cell<usize>>, Vec<Box<dyn Plot>>) {
        let calls = Rc::new(Cell::new(0));
        let plot = CountingPlot {
            calls: calls.clone(),
        };
        (calls, vec![Box::new(plot)])
    }

    fn records() -> Vec<ResultRecord> {
        vec![ResultRecord::new(
            "v1.0.json",
            json!({"total_liquido": 5}).as_object().cloned().unwrap(),
        )]
    }

    #[test]
    fn empty_series_is_not_plotted() {
        let (calls, plots) = counting();
        plot(
            &plots,
            &[],
            &MetricSeries::default(),
            Path::new("out.png"),
            &ChartStyle::default(),
        )
        .unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn plots_once_and_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("charts/out.png");
        let records = records();
        let (calls, plots) = counting();
        plot(
            &plots,
            &version_labels(&records),
            &extract_metrics(&records),
            &output,
            &ChartStyle::default(),
        )
        .unwrap();
        assert_eq!(calls.get(), 1);
        assert!(dir.path().join("charts").is_dir());
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let records = records();
        let (calls, plots) = counting();
        let labels = vec!["v1.0".to_owned(), "v2.0".to_owned()];
        let res = plot(
            &plots,
            &labels,
            &extract_metrics(&records),
            Path::new("out.png"),
            &ChartStyle::default(),
        );
        assert!(res.is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn labels_follow_records() {
        let records = vec![
            ResultRecord::new("a-v1.0.json", Map::new()),
            ResultRecord::new("b.json", Map::new()),
        ];
        assert_eq!(version_labels(&records), ["v1.0", "vunknown"]);
    }
}
