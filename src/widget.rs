//! Widget-level entry points: run the pipeline and materialize either chart
//! datasets or table data from one configuration. Stateless — every call is
//! a pure function of `(rows, config)`, so callers are free to memoize on
//! input identity.

use crate::buckets::pipeline::process;
use crate::buckets::ProcessedData;
use crate::config::WidgetConfig;
use crate::datasets::{build_datasets, Dataset};
use crate::row::Row;
use crate::table::{materialize_table, TableData};

/// Chart rendering output: the labels for the primary axis plus one dataset
/// per metric or split-series bucket.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Group rows per the configured buckets. Exposed for consumers that need
/// the raw hierarchy rather than a rendered shape.
pub fn process_rows(rows: &[Row], config: &WidgetConfig) -> ProcessedData {
    process(rows, &config.buckets)
}

/// Full chart path: pipeline, metric evaluation, per-chart-kind styling.
pub fn render_chart(rows: &[Row], config: &WidgetConfig) -> ChartData {
    let data = process_rows(rows, config);
    let datasets = build_datasets(&data, &config.metrics, &config.styles, config.chart);
    ChartData {
        labels: data.labels,
        datasets,
    }
}

/// Full table path over the same pipeline output.
pub fn render_table(rows: &[Row], config: &WidgetConfig) -> TableData {
    let data = process_rows(rows, config);
    materialize_table(&data, &config.metrics)
}
