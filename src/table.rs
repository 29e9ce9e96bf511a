//! Tabular materializer: the same processed data rendered as columns and
//! rows instead of chart series. Non-split bucket levels become one column
//! each; metrics (or a synthetic `_doc_count`) fill the value columns.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::buckets::aggregator::bucket_rows;
use crate::buckets::{BucketLevel, ProcessedData};
use crate::config::{Metric, MetricAgg};
use crate::format::format_cell;
use crate::metrics::aggregate;
use crate::row::{Row, Scalar};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Map<String, Value>>,
}

/// Synthetic count column used when no metric is configured.
pub const DOC_COUNT_COLUMN: &str = "_doc_count";

/// Render processed data as table columns and rows. With neither buckets nor
/// metrics configured the raw rows are shown with auto-derived columns.
pub fn materialize_table(data: &ProcessedData, metrics: &[Metric]) -> TableData {
    let levels: Vec<&BucketLevel> = data
        .hierarchy
        .iter()
        .filter(|level| !level.spec.is_split())
        .collect();

    if levels.is_empty() && metrics.is_empty() {
        return raw_table(&data.grouped_rows);
    }

    let mut columns: Vec<TableColumn> = levels
        .iter()
        .map(|level| TableColumn {
            key: level.spec.field().to_string(),
            label: level
                .spec
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| capitalize(level.spec.field())),
        })
        .collect();
    let metric_columns = metric_columns(metrics);
    columns.extend(metric_columns.iter().map(|(_, col)| col.clone()));

    let mut rows = Vec::new();
    let mut acc: Vec<(String, Value)> = Vec::new();
    descend(&levels, 0, &data.grouped_rows, &metric_columns, &mut acc, &mut rows);

    TableData { columns, rows }
}

/// Column key/label per metric; a field used twice gets the aggregation name
/// appended so row maps stay lossless.
fn metric_columns(metrics: &[Metric]) -> Vec<(Metric, TableColumn)> {
    if metrics.is_empty() {
        return vec![(
            Metric::count(),
            TableColumn {
                key: DOC_COUNT_COLUMN.to_string(),
                label: "Total".to_string(),
            },
        )];
    }
    let mut used: Vec<String> = Vec::new();
    metrics
        .iter()
        .map(|metric| {
            let base = if metric.field.is_empty() {
                "count".to_string()
            } else {
                metric.field.clone()
            };
            let key = if used.contains(&base) {
                format!("{}_{}", base, agg_name(metric.agg))
            } else {
                base
            };
            used.push(key.clone());
            let label = metric
                .label
                .clone()
                .unwrap_or_else(|| capitalize(&metric.display_label()));
            (metric.clone(), TableColumn { key, label })
        })
        .collect()
}

fn agg_name(agg: MetricAgg) -> &'static str {
    match agg {
        MetricAgg::Sum => "sum",
        MetricAgg::Avg => "avg",
        MetricAgg::Min => "min",
        MetricAgg::Max => "max",
        MetricAgg::Count => "count",
        MetricAgg::Raw => "none",
    }
}

/// Depth-first expansion: each level re-partitions its parent bucket's rows,
/// so the table gets one row per leaf combination. (Chart levels fan out over
/// the full set instead; a drill-down table needs the nesting.)
fn descend(
    levels: &[&BucketLevel],
    depth: usize,
    current_rows: &[Row],
    metric_columns: &[(Metric, TableColumn)],
    acc: &mut Vec<(String, Value)>,
    out: &mut Vec<Map<String, Value>>,
) {
    if depth == levels.len() {
        let mut map = Map::new();
        for (key, value) in acc.iter() {
            map.insert(key.clone(), value.clone());
        }
        for (metric, column) in metric_columns {
            let value = aggregate(current_rows, metric.agg, &metric.field);
            map.insert(column.key.clone(), number_value(value));
        }
        out.push(map);
        return;
    }
    let level = levels[depth];
    for item in bucket_rows(&level.spec, current_rows) {
        acc.push((
            level.spec.field().to_string(),
            Value::String(format_cell(item.display_key())),
        ));
        descend(levels, depth + 1, &item.rows, metric_columns, acc, out);
        acc.pop();
    }
}

/// Fallback when nothing is configured: columns from the first row's fields,
/// raw values with opportunistic date formatting on text cells.
fn raw_table(rows: &[Row]) -> TableData {
    let columns = rows
        .first()
        .map(|row| {
            row.keys()
                .map(|key| TableColumn {
                    key: key.to_string(),
                    label: capitalize(key),
                })
                .collect()
        })
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| {
            let mut map = Map::new();
            for (key, value) in row.iter() {
                map.insert(key.to_string(), cell_value(value));
            }
            map
        })
        .collect();

    TableData { columns, rows }
}

fn cell_value(value: &Scalar) -> Value {
    match value {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => number_value(*n),
        Scalar::Date(dt) => Value::String(format_cell(&dt.to_rfc3339())),
        Scalar::Text(s) => Value::String(format_cell(s)),
    }
}

fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(if n.is_finite() { n } else { 0.0 })
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
