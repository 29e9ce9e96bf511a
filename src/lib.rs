pub mod buckets;
pub mod config;
pub mod datasets;
pub mod error;
pub mod format;
pub mod metrics;
pub mod row;
pub mod table;
pub mod widget;

pub use buckets::date::DateInterval;
pub use buckets::{BucketItem, BucketLevel, ProcessedData, SplitItem, Splits};
pub use config::{
    BucketSpec, ChartKind, Metric, MetricAgg, MetricStyle, Order, RangeEntry, WidgetConfig,
};
pub use datasets::{Dataset, SeriesData};
pub use error::{Error, Result};
pub use row::{rows_from_json, Row, Scalar};
pub use table::{TableColumn, TableData};
pub use widget::{render_chart, render_table, ChartData};
