//! Metric evaluation: one scalar per aggregation over a row subset. Outputs
//! are always finite; malformed values coerce to 0 instead of failing.

use crate::config::MetricAgg;
use crate::row::Row;

/// Compute `agg` over `rows[field]`. Empty inputs produce 0 for every
/// aggregation, including avg (no division by zero) and min/max.
pub fn aggregate(rows: &[Row], agg: MetricAgg, field: &str) -> f64 {
    let value = match agg {
        MetricAgg::Count => rows.len() as f64,
        MetricAgg::Sum => rows.iter().map(|r| r.number_of(field)).sum(),
        MetricAgg::Avg => {
            if rows.is_empty() {
                0.0
            } else {
                rows.iter().map(|r| r.number_of(field)).sum::<f64>() / rows.len() as f64
            }
        }
        MetricAgg::Min => rows
            .iter()
            .map(|r| r.number_of(field))
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.min(v)))
            })
            .unwrap_or(0.0),
        MetricAgg::Max => rows
            .iter()
            .map(|r| r.number_of(field))
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
            .unwrap_or(0.0),
        // In bucket mode raw collapses to the first row's value; the per-row
        // interpretation lives in the dataset builder.
        MetricAgg::Raw => rows.first().map(|r| r.number_of(field)).unwrap_or(0.0),
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Per-row coerced values, for the one-row-one-point chart modes.
pub fn raw_values(rows: &[Row], field: &str) -> Vec<f64> {
    rows.iter()
        .map(|r| {
            let v = r.number_of(field);
            if v.is_finite() {
                v
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Scalar;

    fn rows(values: &[Scalar]) -> Vec<Row> {
        values
            .iter()
            .map(|v| [("sales".to_string(), v.clone())].into_iter().collect())
            .collect()
    }

    fn nums(values: &[f64]) -> Vec<Row> {
        rows(&values.iter().map(|v| Scalar::Number(*v)).collect::<Vec<_>>())
    }

    #[test]
    fn test_sum() {
        assert_eq!(aggregate(&nums(&[10.0, 5.0, 3.0]), MetricAgg::Sum, "sales"), 18.0);
    }

    #[test]
    fn test_avg() {
        assert_eq!(aggregate(&nums(&[10.0, 20.0]), MetricAgg::Avg, "sales"), 15.0);
    }

    #[test]
    fn test_avg_empty_is_zero() {
        assert_eq!(aggregate(&[], MetricAgg::Avg, "sales"), 0.0);
    }

    #[test]
    fn test_min_max() {
        let r = nums(&[7.0, -2.0, 4.0]);
        assert_eq!(aggregate(&r, MetricAgg::Min, "sales"), -2.0);
        assert_eq!(aggregate(&r, MetricAgg::Max, "sales"), 7.0);
        assert_eq!(aggregate(&[], MetricAgg::Min, "sales"), 0.0);
        assert_eq!(aggregate(&[], MetricAgg::Max, "sales"), 0.0);
    }

    #[test]
    fn test_count_ignores_field() {
        assert_eq!(aggregate(&nums(&[1.0, 2.0]), MetricAgg::Count, "nonexistent"), 2.0);
    }

    #[test]
    fn test_raw_takes_first_value() {
        assert_eq!(aggregate(&nums(&[9.0, 4.0]), MetricAgg::Raw, "sales"), 9.0);
        assert_eq!(aggregate(&[], MetricAgg::Raw, "sales"), 0.0);
    }

    #[test]
    fn test_malformed_values_coerce_to_zero() {
        let r = rows(&[
            Scalar::Text("12".to_string()),
            Scalar::Text("garbage".to_string()),
            Scalar::Null,
            Scalar::Bool(true),
        ]);
        assert_eq!(aggregate(&r, MetricAgg::Sum, "sales"), 12.0);
        assert_eq!(aggregate(&r, MetricAgg::Avg, "sales"), 3.0);
        for v in raw_values(&r, "sales") {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_missing_field_is_zero() {
        assert_eq!(aggregate(&nums(&[1.0]), MetricAgg::Sum, "other"), 0.0);
    }
}
