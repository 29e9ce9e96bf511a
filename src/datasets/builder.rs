//! Combine processed buckets with metrics into renderer-ready datasets.
//! Two mutually exclusive modes: one dataset per split-series bucket when a
//! `split_series` level produced items, otherwise one dataset per metric.

use crate::buckets::aggregator::row_bucket_key;
use crate::buckets::ProcessedData;
use crate::config::{ChartKind, Metric, MetricAgg, MetricStyle};
use crate::datasets::{style, BubblePoint, Dataset, ScatterPoint, SeriesData};
use crate::metrics::{aggregate, raw_values};
use crate::row::Row;

/// Build the full dataset list for one widget.
pub fn build_datasets(
    data: &ProcessedData,
    metrics: &[Metric],
    styles: &[MetricStyle],
    chart: ChartKind,
) -> Vec<Dataset> {
    let mut datasets = if !data.splits.series.is_empty() {
        split_series_datasets(data, metrics, styles, chart)
    } else {
        metric_datasets(data, metrics, styles, chart)
    };
    // Pie-like charts render a single series; the slice axis is the labels.
    if chart.is_pie_like() {
        datasets.truncate(1);
    }
    for (index, dataset) in datasets.iter_mut().enumerate() {
        style::apply(chart, index, styles, dataset);
    }
    datasets
}

fn default_metric() -> Metric {
    Metric::count()
}

/// Values aligned to the primary-axis labels, absent buckets padded with 0 by
/// the evaluator itself (every aggregation of nothing is 0).
fn label_aligned_values(data: &ProcessedData, metric: &Metric) -> Vec<f64> {
    match data.primary_level() {
        Some(level) => level
            .items
            .iter()
            .map(|item| aggregate(&item.rows, metric.agg, &metric.field))
            .collect(),
        None => vec![aggregate(&data.grouped_rows, metric.agg, &metric.field)],
    }
}

fn metric_datasets(
    data: &ProcessedData,
    metrics: &[Metric],
    styles: &[MetricStyle],
    chart: ChartKind,
) -> Vec<Dataset> {
    let fallback = [default_metric()];
    let metrics: &[Metric] = if metrics.is_empty() { &fallback } else { metrics };

    metrics
        .iter()
        .enumerate()
        .map(|(index, metric)| {
            let series = if chart.is_point_based() && metric.agg == MetricAgg::Raw {
                // One row, one point: the raw mode for point clouds.
                per_row_points(&data.grouped_rows, metric, styles.get(index), chart)
            } else {
                to_series(label_aligned_values(data, metric), styles.get(index), chart)
            };
            Dataset::new(metric.display_label(), series)
        })
        .collect()
}

fn split_series_datasets(
    data: &ProcessedData,
    metrics: &[Metric],
    styles: &[MetricStyle],
    chart: ChartKind,
) -> Vec<Dataset> {
    let metric = metrics.first().cloned().unwrap_or_else(default_metric);
    let Some(level) = data.primary_level() else {
        return Vec::new();
    };
    let label_keys: Vec<&str> = level.items.iter().map(|item| item.key.as_str()).collect();

    data.splits
        .series
        .iter()
        .enumerate()
        .map(|(index, split)| {
            let values: Vec<f64> = label_keys
                .iter()
                .map(|key| {
                    let rows: Vec<Row> = split
                        .rows
                        .iter()
                        .filter(|row| {
                            row_bucket_key(&level.spec, row).as_deref() == Some(*key)
                        })
                        .cloned()
                        .collect();
                    aggregate(&rows, metric.agg, &metric.field)
                })
                .collect();
            Dataset::new(split.key.clone(), to_series(values, styles.get(index), chart))
        })
        .collect()
}

fn to_series(values: Vec<f64>, style: Option<&MetricStyle>, chart: ChartKind) -> SeriesData {
    match chart {
        ChartKind::Scatter => SeriesData::Points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ScatterPoint { x: i as f64, y: *v })
                .collect(),
        ),
        ChartKind::Bubble => {
            let radius = bubble_radius(style);
            SeriesData::Bubbles(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| BubblePoint {
                        x: i as f64,
                        y: *v,
                        r: radius,
                    })
                    .collect(),
            )
        }
        _ => SeriesData::Values(values),
    }
}

fn per_row_points(
    rows: &[Row],
    metric: &Metric,
    style: Option<&MetricStyle>,
    chart: ChartKind,
) -> SeriesData {
    let values = raw_values(rows, &metric.field);
    to_series(values, style, chart)
}

fn bubble_radius(style: Option<&MetricStyle>) -> f64 {
    style.and_then(|s| s.point_radius).unwrap_or(8.0)
}
