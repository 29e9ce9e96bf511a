//! Partition a row set into buckets for exactly one spec. Ordering,
//! `min_doc_count` filtering and `size` truncation all happen here; split
//! fan-out does not (that is the pipeline's job).

use std::collections::HashMap;

use crate::buckets::date::parse_date;
use crate::buckets::BucketItem;
use crate::config::{
    BucketSpec, DateHistogramBucket, HistogramBucket, Order, RangeBucket, TermsBucket,
};
use crate::format::format_date_key;
use crate::row::{fmt_number, Row};

/// Group `rows` under one bucket spec. Split kinds group exactly like terms.
pub fn bucket_rows(spec: &BucketSpec, rows: &[Row]) -> Vec<BucketItem> {
    match spec {
        BucketSpec::Terms(t)
        | BucketSpec::SplitSeries(t)
        | BucketSpec::SplitRows(t)
        | BucketSpec::SplitChart(t) => terms_buckets(t, rows),
        BucketSpec::Histogram(h) => histogram_buckets(h, rows),
        BucketSpec::DateHistogram(d) => date_histogram_buckets(d, rows),
        BucketSpec::Range(r) => range_buckets(r, rows),
    }
}

/// The key a single row would receive under `spec`, or `None` when the row
/// cannot be bucketed (unparsable date, no range matches). Split-series
/// dataset building uses this to match a split's rows against the primary
/// axis labels.
pub fn row_bucket_key(spec: &BucketSpec, row: &Row) -> Option<String> {
    match spec {
        BucketSpec::Terms(t)
        | BucketSpec::SplitSeries(t)
        | BucketSpec::SplitRows(t)
        | BucketSpec::SplitChart(t) => Some(row.key_of(&t.field)),
        BucketSpec::Histogram(h) => {
            let interval = if h.interval > 0.0 { h.interval } else { 1.0 };
            let bucket = (row.number_of(&h.field) / interval).floor() * interval;
            Some(fmt_number(bucket))
        }
        BucketSpec::DateHistogram(d) => {
            let dt = parse_date(row.get(&d.field)?)?;
            Some(d.date_interval.bucket_key(dt))
        }
        BucketSpec::Range(r) => {
            let value = row.get(&r.field).and_then(|s| s.as_number_opt())?;
            r.ranges
                .iter()
                .find(|range| {
                    range.from.map_or(true, |from| value >= from)
                        && range.to.map_or(true, |to| value < to)
                })
                .map(|range| {
                    range
                        .label
                        .clone()
                        .unwrap_or_else(|| range_key(range.from, range.to))
                })
        }
    }
}

/// Insertion-ordered grouping: first occurrence fixes a group's position,
/// which is what makes the later count sort's tie-break deterministic.
fn group_by_key<'a, F>(rows: &'a [Row], key_of: F) -> Vec<(String, Vec<Row>)>
where
    F: Fn(&'a Row) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();
    for row in rows {
        let Some(key) = key_of(row) else { continue };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row.clone());
    }
    groups
}

fn into_items(groups: Vec<(String, Vec<Row>)>) -> Vec<BucketItem> {
    groups
        .into_iter()
        .map(|(key, rows)| BucketItem {
            key,
            key_as_string: None,
            doc_count: rows.len(),
            rows,
        })
        .collect()
}

fn terms_buckets(spec: &TermsBucket, rows: &[Row]) -> Vec<BucketItem> {
    let groups = group_by_key(rows, |row| Some(row.key_of(&spec.field)));
    let mut items = into_items(groups);
    items.retain(|item| item.doc_count >= spec.min_doc_count);
    // Stable sort keeps insertion order for equal counts.
    match spec.order {
        Order::Asc => items.sort_by(|a, b| a.doc_count.cmp(&b.doc_count)),
        Order::Desc => items.sort_by(|a, b| b.doc_count.cmp(&a.doc_count)),
    }
    items.truncate(spec.size);
    items
}

fn histogram_buckets(spec: &HistogramBucket, rows: &[Row]) -> Vec<BucketItem> {
    let interval = if spec.interval > 0.0 { spec.interval } else { 1.0 };
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(f64, String, Vec<Row>)> = Vec::new();
    for row in rows {
        let value = row.number_of(&spec.field);
        let bucket = (value / interval).floor() * interval;
        let key = fmt_number(bucket);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((bucket, key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].2.push(row.clone());
    }
    // Numeric buckets are ordinal by construction: always ascending.
    groups.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut items: Vec<BucketItem> = groups
        .into_iter()
        .map(|(_, key, rows)| BucketItem {
            key,
            key_as_string: None,
            doc_count: rows.len(),
            rows,
        })
        .collect();
    items.retain(|item| item.doc_count >= spec.min_doc_count);
    items.truncate(spec.size);
    items
}

fn date_histogram_buckets(spec: &DateHistogramBucket, rows: &[Row]) -> Vec<BucketItem> {
    let groups = group_by_key(rows, |row| {
        let value = row.get(&spec.field)?;
        match parse_date(value) {
            Some(dt) => Some(spec.date_interval.bucket_key(dt)),
            None => {
                tracing::warn!(field = %spec.field, value = ?value, "Dropping row with unparsable date");
                None
            }
        }
    });
    let mut items = into_items(groups);
    // Fixed-width keys make lexicographic order chronological.
    items.sort_by(|a, b| a.key.cmp(&b.key));
    items.retain(|item| item.doc_count >= spec.min_doc_count);
    items.truncate(spec.size);
    for item in &mut items {
        item.key_as_string = Some(format_date_key(&item.key, spec.date_interval));
    }
    items
}

fn range_key(from: Option<f64>, to: Option<f64>) -> String {
    let from = from.map(fmt_number).unwrap_or_else(|| "*".to_string());
    let to = to.map(fmt_number).unwrap_or_else(|| "*".to_string());
    format!("{}-{}", from, to)
}

fn range_buckets(spec: &RangeBucket, rows: &[Row]) -> Vec<BucketItem> {
    let mut items = Vec::with_capacity(spec.ranges.len());
    for range in &spec.ranges {
        // Half-open interval; rows without a numeric value never match.
        let matched: Vec<Row> = rows
            .iter()
            .filter(|row| {
                let Some(value) = row.get(&spec.field).and_then(|s| s.as_number_opt()) else {
                    return false;
                };
                range.from.map_or(true, |from| value >= from)
                    && range.to.map_or(true, |to| value < to)
            })
            .cloned()
            .collect();
        if matched.len() < spec.min_doc_count {
            continue;
        }
        items.push(BucketItem {
            key: range
                .label
                .clone()
                .unwrap_or_else(|| range_key(range.from, range.to)),
            key_as_string: None,
            doc_count: matched.len(),
            rows: matched,
        });
    }
    // Declared order, no size cap: a range list is explicit.
    items
}
