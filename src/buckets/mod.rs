//! Grouping engine: the per-level aggregator, the multi-level pipeline and
//! the result types they share.

pub mod aggregator;
pub mod date;
pub mod pipeline;

use serde::Serialize;

use crate::config::BucketSpec;
use crate::row::Row;

/// One group of rows sharing a derived key under a single bucket spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketItem {
    pub key: String,
    /// Human-readable label, present only for date buckets where it differs
    /// from the sortable key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_as_string: Option<String>,
    pub doc_count: usize,
    pub rows: Vec<Row>,
}

impl BucketItem {
    pub fn display_key(&self) -> &str {
        self.key_as_string.as_deref().unwrap_or(&self.key)
    }
}

/// One executed level of the pipeline. `passthrough_rows` is the full
/// unfiltered row set this level received; it is what the next level groups,
/// so level counts and size caps never shrink the data deeper levels see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketLevel {
    pub spec: BucketSpec,
    pub level: usize,
    pub items: Vec<BucketItem>,
    pub passthrough_rows: Vec<Row>,
}

/// A bucket extracted from a `split_*` level into one of the side-channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitItem {
    pub key: String,
    pub rows: Vec<Row>,
    pub spec: BucketSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Splits {
    pub series: Vec<SplitItem>,
    pub rows: Vec<SplitItem>,
    pub charts: Vec<SplitItem>,
}

/// The pipeline's sole output contract, consumed by the dataset builder and
/// the tabular materializer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedData {
    pub grouped_rows: Vec<Row>,
    pub labels: Vec<String>,
    pub hierarchy: Vec<BucketLevel>,
    pub splits: Splits,
}

impl ProcessedData {
    /// First non-degenerate grouping level, if any.
    pub fn primary_level(&self) -> Option<&BucketLevel> {
        self.hierarchy.first()
    }
}
