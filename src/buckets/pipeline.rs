//! Chain bucket specs over a row set, accumulating the level hierarchy and
//! fanning split buckets into their side-channels.

use crate::buckets::aggregator::bucket_rows;
use crate::buckets::{BucketLevel, ProcessedData, SplitItem, Splits};
use crate::config::{BucketSpec, SplitSlot};
use crate::row::Row;

/// The label used when no bucket spec is configured and the whole row set is
/// a single group.
pub const TOTAL_LABEL: &str = "Total";

/// Execute the bucket pipeline. Every level groups the full row set handed to
/// it; a level's size cap and `min_doc_count` shape that level's items only,
/// never the rows deeper levels see. Levels are independent facets over the
/// same population, not nested drill-downs.
pub fn process(rows: &[Row], specs: &[BucketSpec]) -> ProcessedData {
    let current_rows: Vec<Row> = rows.to_vec();
    let mut hierarchy: Vec<BucketLevel> = Vec::with_capacity(specs.len());
    let mut splits = Splits::default();

    for (level, spec) in specs.iter().enumerate() {
        let items = bucket_rows(spec, &current_rows);
        if let Some(slot) = spec.split_slot() {
            let target = match slot {
                SplitSlot::Series => &mut splits.series,
                SplitSlot::Rows => &mut splits.rows,
                SplitSlot::Charts => &mut splits.charts,
            };
            for item in &items {
                target.push(SplitItem {
                    key: item.display_key().to_string(),
                    rows: item.rows.clone(),
                    spec: spec.clone(),
                });
            }
        }
        hierarchy.push(BucketLevel {
            spec: spec.clone(),
            level,
            items,
            passthrough_rows: current_rows.clone(),
        });
    }

    let labels = match hierarchy.first() {
        Some(first) => first
            .items
            .iter()
            .map(|item| item.display_key().to_string())
            .collect(),
        None => vec![TOTAL_LABEL.to_string()],
    };

    ProcessedData {
        grouped_rows: current_rows,
        labels,
        hierarchy,
        splits,
    }
}
