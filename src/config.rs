//! Widget configuration model: bucket specs, metrics, styles and chart kind.
//!
//! This is the declarative input the UI layer hands to the engine. Everything
//! deserializes from JSON; unknown bucket types fall back to `terms` rather
//! than failing, so a stale saved widget still renders something.

use crate::buckets::date::DateInterval;
use serde::{Deserialize, Deserializer, Serialize};

/// Bucket ordering by document count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// One entry of a `range` bucket. Either bound may be omitted for an
/// unbounded side; membership is half-open (`from <= value < to`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsBucket {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub order: Order,
    pub size: usize,
    pub min_doc_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub interval: f64,
    pub size: usize,
    pub min_doc_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateHistogramBucket {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub date_interval: DateInterval,
    pub size: usize,
    pub min_doc_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBucket {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub ranges: Vec<RangeEntry>,
    pub min_doc_count: usize,
}

/// Which side-channel a split bucket fans into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSlot {
    Series,
    Rows,
    Charts,
}

/// One level of the grouping pipeline. Split kinds group exactly like terms;
/// the pipeline redirects their items into `splits.*` instead of the primary
/// axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketSpec {
    Terms(TermsBucket),
    Histogram(HistogramBucket),
    DateHistogram(DateHistogramBucket),
    Range(RangeBucket),
    SplitSeries(TermsBucket),
    SplitRows(TermsBucket),
    SplitChart(TermsBucket),
}

pub const DEFAULT_TERMS_SIZE: usize = 10;
pub const DEFAULT_HISTOGRAM_SIZE: usize = 50;
pub const DEFAULT_DATE_HISTOGRAM_SIZE: usize = 100;

impl BucketSpec {
    pub fn terms(field: impl Into<String>) -> BucketSpec {
        BucketSpec::Terms(TermsBucket::new(field))
    }

    pub fn terms_with_size(field: impl Into<String>, size: usize) -> BucketSpec {
        let mut bucket = TermsBucket::new(field);
        bucket.size = size;
        BucketSpec::Terms(bucket)
    }

    pub fn histogram(field: impl Into<String>, interval: f64) -> BucketSpec {
        BucketSpec::Histogram(HistogramBucket {
            field: field.into(),
            label: None,
            interval,
            size: DEFAULT_HISTOGRAM_SIZE,
            min_doc_count: 1,
        })
    }

    pub fn date_histogram(field: impl Into<String>, interval: DateInterval) -> BucketSpec {
        BucketSpec::DateHistogram(DateHistogramBucket {
            field: field.into(),
            label: None,
            date_interval: interval,
            size: DEFAULT_DATE_HISTOGRAM_SIZE,
            min_doc_count: 1,
        })
    }

    pub fn range(field: impl Into<String>, ranges: Vec<RangeEntry>) -> BucketSpec {
        BucketSpec::Range(RangeBucket {
            field: field.into(),
            label: None,
            ranges,
            min_doc_count: 1,
        })
    }

    pub fn split_series(field: impl Into<String>) -> BucketSpec {
        BucketSpec::SplitSeries(TermsBucket::new(field))
    }

    pub fn split_rows(field: impl Into<String>) -> BucketSpec {
        BucketSpec::SplitRows(TermsBucket::new(field))
    }

    pub fn split_chart(field: impl Into<String>) -> BucketSpec {
        BucketSpec::SplitChart(TermsBucket::new(field))
    }

    pub fn with_order(mut self, order: Order) -> BucketSpec {
        match &mut self {
            BucketSpec::Terms(t)
            | BucketSpec::SplitSeries(t)
            | BucketSpec::SplitRows(t)
            | BucketSpec::SplitChart(t) => t.order = order,
            _ => {}
        }
        self
    }

    pub fn with_min_doc_count(mut self, min_doc_count: usize) -> BucketSpec {
        match &mut self {
            BucketSpec::Terms(t)
            | BucketSpec::SplitSeries(t)
            | BucketSpec::SplitRows(t)
            | BucketSpec::SplitChart(t) => t.min_doc_count = min_doc_count,
            BucketSpec::Histogram(h) => h.min_doc_count = min_doc_count,
            BucketSpec::DateHistogram(d) => d.min_doc_count = min_doc_count,
            BucketSpec::Range(r) => r.min_doc_count = min_doc_count,
        }
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> BucketSpec {
        let label = Some(label.into());
        match &mut self {
            BucketSpec::Terms(t)
            | BucketSpec::SplitSeries(t)
            | BucketSpec::SplitRows(t)
            | BucketSpec::SplitChart(t) => t.label = label,
            BucketSpec::Histogram(h) => h.label = label,
            BucketSpec::DateHistogram(d) => d.label = label,
            BucketSpec::Range(r) => r.label = label,
        }
        self
    }

    pub fn field(&self) -> &str {
        match self {
            BucketSpec::Terms(t)
            | BucketSpec::SplitSeries(t)
            | BucketSpec::SplitRows(t)
            | BucketSpec::SplitChart(t) => &t.field,
            BucketSpec::Histogram(h) => &h.field,
            BucketSpec::DateHistogram(d) => &d.field,
            BucketSpec::Range(r) => &r.field,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            BucketSpec::Terms(t)
            | BucketSpec::SplitSeries(t)
            | BucketSpec::SplitRows(t)
            | BucketSpec::SplitChart(t) => t.label.as_deref(),
            BucketSpec::Histogram(h) => h.label.as_deref(),
            BucketSpec::DateHistogram(d) => d.label.as_deref(),
            BucketSpec::Range(r) => r.label.as_deref(),
        }
    }

    pub fn split_slot(&self) -> Option<SplitSlot> {
        match self {
            BucketSpec::SplitSeries(_) => Some(SplitSlot::Series),
            BucketSpec::SplitRows(_) => Some(SplitSlot::Rows),
            BucketSpec::SplitChart(_) => Some(SplitSlot::Charts),
            _ => None,
        }
    }

    pub fn is_split(&self) -> bool {
        self.split_slot().is_some()
    }
}

impl TermsBucket {
    pub fn new(field: impl Into<String>) -> Self {
        TermsBucket {
            field: field.into(),
            label: None,
            order: Order::Desc,
            size: DEFAULT_TERMS_SIZE,
            min_doc_count: 1,
        }
    }
}

/// Flat wire shape. Deserializing through this instead of the tagged enum is
/// what lets an unknown or missing `type` degrade to terms.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct RawBucketSpec {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    field: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    order: Order,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    min_doc_count: Option<usize>,
    #[serde(default)]
    interval: Option<f64>,
    #[serde(default)]
    date_interval: Option<DateInterval>,
    #[serde(default)]
    ranges: Vec<RangeEntry>,
}

impl From<RawBucketSpec> for BucketSpec {
    fn from(raw: RawBucketSpec) -> Self {
        let min_doc_count = raw.min_doc_count.unwrap_or(1).max(1);
        let terms = |raw: &RawBucketSpec| TermsBucket {
            field: raw.field.clone(),
            label: raw.label.clone(),
            order: raw.order,
            size: raw.size.unwrap_or(DEFAULT_TERMS_SIZE),
            min_doc_count,
        };
        match raw.kind.as_str() {
            "terms" => BucketSpec::Terms(terms(&raw)),
            "split_series" => BucketSpec::SplitSeries(terms(&raw)),
            "split_rows" => BucketSpec::SplitRows(terms(&raw)),
            "split_chart" => BucketSpec::SplitChart(terms(&raw)),
            "histogram" => BucketSpec::Histogram(HistogramBucket {
                field: raw.field,
                label: raw.label,
                interval: raw.interval.unwrap_or(1.0),
                size: raw.size.unwrap_or(DEFAULT_HISTOGRAM_SIZE),
                min_doc_count,
            }),
            "date_histogram" => BucketSpec::DateHistogram(DateHistogramBucket {
                field: raw.field,
                label: raw.label,
                date_interval: raw.date_interval.unwrap_or_default(),
                size: raw.size.unwrap_or(DEFAULT_DATE_HISTOGRAM_SIZE),
                min_doc_count,
            }),
            "range" => BucketSpec::Range(RangeBucket {
                field: raw.field,
                label: raw.label,
                ranges: raw.ranges,
                min_doc_count,
            }),
            // Intentional fallback: an unrecognized type renders as terms
            // instead of breaking the widget.
            other => {
                if !other.is_empty() {
                    tracing::debug!(bucket_type = %other, "Unknown bucket type, falling back to terms");
                }
                BucketSpec::Terms(terms(&raw))
            }
        }
    }
}

impl<'de> Deserialize<'de> for BucketSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawBucketSpec::deserialize(deserializer).map(BucketSpec::from)
    }
}

/// Aggregation applied to a metric field over a row subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricAgg {
    Sum,
    Avg,
    Min,
    Max,
    #[default]
    Count,
    /// One row, one data point: the field's own coerced value. Serialized as
    /// `"none"` on the wire.
    #[serde(rename = "none")]
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Empty for `count`, which tallies rows without reading a field.
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub agg: MetricAgg,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Metric {
    pub fn new(field: impl Into<String>, agg: MetricAgg) -> Self {
        Metric {
            field: field.into(),
            agg,
            label: None,
        }
    }

    pub fn sum(field: impl Into<String>) -> Self {
        Metric::new(field, MetricAgg::Sum)
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Metric::new(field, MetricAgg::Avg)
    }

    pub fn min(field: impl Into<String>) -> Self {
        Metric::new(field, MetricAgg::Min)
    }

    pub fn max(field: impl Into<String>) -> Self {
        Metric::new(field, MetricAgg::Max)
    }

    pub fn count() -> Self {
        Metric::new("", MetricAgg::Count)
    }

    pub fn raw(field: impl Into<String>) -> Self {
        Metric::new(field, MetricAgg::Raw)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Series/column label: explicit label, else the field name, else the
    /// aggregation name for field-less metrics like count.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        if self.field.is_empty() {
            return "count".to_string();
        }
        self.field.clone()
    }
}

/// User-supplied visual overrides for one series (or, for pie-like charts,
/// one slice). Every attribute is optional; defaults come from the chart
/// kind's style resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MetricStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Dash pattern as a comma-separated string, e.g. `"5,5"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    Bubble,
    Radar,
}

impl ChartKind {
    /// Pie-like charts style one slice per label instead of one color per
    /// series.
    pub fn is_pie_like(&self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Doughnut)
    }

    /// Point-cloud charts emit `{x, y}` (or `{x, y, r}`) arrays instead of
    /// scalar arrays.
    pub fn is_point_based(&self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::Bubble)
    }

    /// Renderer hint: radar replaces the x/y scale pair with a single radial
    /// scale. Scale wiring itself belongs to the rendering layer.
    pub fn uses_radial_scale(&self) -> bool {
        matches!(self, ChartKind::Radar)
    }
}

/// Everything the UI supplies for one widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub buckets: Vec<BucketSpec>,
    pub metrics: Vec<Metric>,
    pub styles: Vec<MetricStyle>,
    pub chart: ChartKind,
}

impl WidgetConfig {
    pub fn from_json(json: &str) -> crate::Result<WidgetConfig> {
        let config: WidgetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Boundary validation only. The engine itself never rejects data; this
    /// catches configurations that could not have come from a working UI.
    pub fn validate(&self) -> crate::Result<()> {
        for bucket in &self.buckets {
            if bucket.field().is_empty() {
                return Err(crate::Error::Config(
                    "bucket is missing a field name".to_string(),
                ));
            }
        }
        for metric in &self.metrics {
            if metric.field.is_empty() && metric.agg != MetricAgg::Count {
                return Err(crate::Error::Config(format!(
                    "metric with aggregation {:?} is missing a field name",
                    metric.agg
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_defaults() {
        let spec: BucketSpec =
            serde_json::from_str(r#"{"type": "terms", "field": "region"}"#).unwrap();
        match spec {
            BucketSpec::Terms(t) => {
                assert_eq!(t.field, "region");
                assert_eq!(t.size, DEFAULT_TERMS_SIZE);
                assert_eq!(t.min_doc_count, 1);
                assert_eq!(t.order, Order::Desc);
            }
            other => panic!("expected terms, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_terms() {
        let spec: BucketSpec =
            serde_json::from_str(r#"{"type": "geo_grid", "field": "location"}"#).unwrap();
        assert!(matches!(spec, BucketSpec::Terms(_)));
        assert_eq!(spec.field(), "location");
    }

    #[test]
    fn test_missing_type_falls_back_to_terms() {
        let spec: BucketSpec = serde_json::from_str(r#"{"field": "region"}"#).unwrap();
        assert!(matches!(spec, BucketSpec::Terms(_)));
    }

    #[test]
    fn test_count_metric_without_field() {
        let metric: Metric = serde_json::from_str(r#"{"agg": "count"}"#).unwrap();
        assert_eq!(metric.agg, MetricAgg::Count);
        assert_eq!(metric.field, "");
    }

    #[test]
    fn test_date_histogram_parsing() {
        let spec: BucketSpec = serde_json::from_str(
            r#"{"type": "date_histogram", "field": "created_at", "date_interval": "month"}"#,
        )
        .unwrap();
        match spec {
            BucketSpec::DateHistogram(d) => {
                assert_eq!(d.date_interval, crate::buckets::date::DateInterval::Month);
                assert_eq!(d.size, DEFAULT_DATE_HISTOGRAM_SIZE);
            }
            other => panic!("expected date_histogram, got {:?}", other),
        }
    }

    #[test]
    fn test_split_slot_routing() {
        assert_eq!(
            BucketSpec::split_series("x").split_slot(),
            Some(SplitSlot::Series)
        );
        assert_eq!(
            BucketSpec::split_rows("x").split_slot(),
            Some(SplitSlot::Rows)
        );
        assert_eq!(
            BucketSpec::split_chart("x").split_slot(),
            Some(SplitSlot::Charts)
        );
        assert_eq!(BucketSpec::terms("x").split_slot(), None);
    }

    #[test]
    fn test_metric_agg_none_alias() {
        let metric: Metric =
            serde_json::from_str(r#"{"field": "price", "agg": "none"}"#).unwrap();
        assert_eq!(metric.agg, MetricAgg::Raw);
    }

    #[test]
    fn test_widget_config_validation() {
        let config = WidgetConfig {
            buckets: vec![BucketSpec::terms("")],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WidgetConfig {
            metrics: vec![Metric::count()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_doc_count_floor() {
        let spec: BucketSpec = serde_json::from_str(
            r#"{"type": "terms", "field": "region", "min_doc_count": 0}"#,
        )
        .unwrap();
        match spec {
            BucketSpec::Terms(t) => assert_eq!(t.min_doc_count, 1),
            other => panic!("expected terms, got {:?}", other),
        }
    }
}
