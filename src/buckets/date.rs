//! Calendar bucketing: interval flooring, fixed-width bucket keys and the
//! lenient date parsing the rest of the engine relies on.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::row::Scalar;

/// Calendar granularity for date histogram buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateInterval {
    Year,
    Month,
    Week,
    #[default]
    Day,
    Hour,
    Minute,
}

impl DateInterval {
    /// Derive the bucket key for a timestamp. Keys use fixed-width
    /// zero-padded components so lexicographic order is chronological order:
    /// `2024`, `2024-03`, `2024-W09` (ISO-8601, Monday start), `2024-03-05`,
    /// `2024-03-05T14`, `2024-03-05T14:30`.
    pub fn bucket_key(&self, dt: DateTime<Utc>) -> String {
        match self {
            DateInterval::Year => format!("{:04}", dt.year()),
            DateInterval::Month => format!("{:04}-{:02}", dt.year(), dt.month()),
            DateInterval::Week => {
                let iso = dt.iso_week();
                format!("{:04}-W{:02}", iso.year(), iso.week())
            }
            DateInterval::Day => dt.format("%Y-%m-%d").to_string(),
            DateInterval::Hour => dt.format("%Y-%m-%dT%H").to_string(),
            DateInterval::Minute => dt.format("%Y-%m-%dT%H:%M").to_string(),
        }
    }

    /// Parse a bucket key produced by [`bucket_key`](Self::bucket_key) back
    /// into the timestamp at the start of the interval. Used by the label
    /// formatter; returns `None` on anything that is not a well-formed key.
    pub fn parse_key(&self, key: &str) -> Option<DateTime<Utc>> {
        let naive = match self {
            DateInterval::Year => {
                let year: i32 = key.parse().ok()?;
                NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?
            }
            DateInterval::Month => {
                let (y, m) = key.split_once('-')?;
                let year: i32 = y.parse().ok()?;
                let month: u32 = m.parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?
            }
            DateInterval::Week => {
                let (y, w) = key.split_once("-W")?;
                let year: i32 = y.parse().ok()?;
                let week: u32 = w.parse().ok()?;
                NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?.and_hms_opt(0, 0, 0)?
            }
            DateInterval::Day => NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)?,
            DateInterval::Hour => {
                NaiveDateTime::parse_from_str(&format!("{}:00", key), "%Y-%m-%dT%H:%M").ok()?
            }
            DateInterval::Minute => {
                NaiveDateTime::parse_from_str(key, "%Y-%m-%dT%H:%M").ok()?
            }
        };
        Some(Utc.from_utc_datetime(&naive))
    }
}

/// Best-effort date parsing over the scalar model. Accepts date values,
/// RFC3339 strings, common naive date/datetime strings and epoch
/// milliseconds. Anything else is `None` — callers drop the row, never fail.
pub fn parse_date(value: &Scalar) -> Option<DateTime<Utc>> {
    match value {
        Scalar::Date(dt) => Some(*dt),
        Scalar::Text(s) => parse_date_str(s.trim()),
        Scalar::Number(n) if n.is_finite() => Utc.timestamp_millis_opt(*n as i64).single(),
        _ => None,
    }
}

pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(s: &str) -> DateTime<Utc> {
        parse_date_str(s).expect("valid test date")
    }

    #[test]
    fn test_bucket_keys_are_fixed_width() {
        let dt = date("2024-03-05T14:30:45");
        assert_eq!(DateInterval::Year.bucket_key(dt), "2024");
        assert_eq!(DateInterval::Month.bucket_key(dt), "2024-03");
        assert_eq!(DateInterval::Day.bucket_key(dt), "2024-03-05");
        assert_eq!(DateInterval::Hour.bucket_key(dt), "2024-03-05T14");
        assert_eq!(DateInterval::Minute.bucket_key(dt), "2024-03-05T14:30");
    }

    #[test]
    fn test_iso_week_key() {
        // 2024-01-01 is a Monday, ISO week 1 of 2024.
        assert_eq!(DateInterval::Week.bucket_key(date("2024-01-01")), "2024-W01");
        // 2023-01-01 is a Sunday, still ISO week 52 of 2022.
        assert_eq!(DateInterval::Week.bucket_key(date("2023-01-01")), "2022-W52");
    }

    #[test]
    fn test_key_roundtrip() {
        for (interval, key) in [
            (DateInterval::Year, "2024"),
            (DateInterval::Month, "2024-03"),
            (DateInterval::Week, "2024-W09"),
            (DateInterval::Day, "2024-03-05"),
            (DateInterval::Hour, "2024-03-05T14"),
            (DateInterval::Minute, "2024-03-05T14:30"),
        ] {
            let dt = interval.parse_key(key).expect("key parses");
            assert_eq!(interval.bucket_key(dt), key);
        }
    }

    #[test]
    fn test_parse_key_rejects_garbage() {
        assert_eq!(DateInterval::Month.parse_key("hello"), None);
        assert_eq!(DateInterval::Week.parse_key("2024-09"), None);
        assert_eq!(DateInterval::Day.parse_key("2024-13-40"), None);
    }

    #[test]
    fn test_parse_date_variants() {
        assert!(parse_date(&Scalar::Text("2024-01-15".to_string())).is_some());
        assert!(parse_date(&Scalar::Text("2024-01-15T10:30:00Z".to_string())).is_some());
        assert!(parse_date(&Scalar::Text("2024-01-15 10:30:00".to_string())).is_some());
        assert!(parse_date(&Scalar::Text("not a date".to_string())).is_none());
        assert!(parse_date(&Scalar::Null).is_none());
        assert!(parse_date(&Scalar::Bool(true)).is_none());

        let epoch_ms = Scalar::Number(1_705_314_600_000.0); // 2024-01-15T10:30:00Z
        let dt = parse_date(&epoch_ms).expect("epoch millis parse");
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }
}
