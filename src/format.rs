//! Label formatting: raw date-bucket keys to human-readable French labels,
//! plus the opportunistic date detection the table materializer applies to
//! string cells. Pure string-to-string, never fails — on any parse problem
//! the input comes back unchanged.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::buckets::date::{parse_date_str, DateInterval};

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

fn month_name(dt: DateTime<Utc>) -> &'static str {
    MONTHS[dt.month0() as usize]
}

fn short_date(dt: DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// Render a bucket key produced by a date histogram as a display label.
/// `2024` stays `2024`; `2024-01` becomes `janvier 2024`; `2024-W03` becomes
/// `Semaine 3, 2024`; `2024-01-15` becomes `15 janvier 2024`; hour and minute
/// keys render as a short date with a time suffix.
pub fn format_date_key(key: &str, interval: DateInterval) -> String {
    let Some(dt) = interval.parse_key(key) else {
        return key.to_string();
    };
    match interval {
        DateInterval::Year => key.to_string(),
        DateInterval::Month => format!("{} {}", month_name(dt), dt.year()),
        DateInterval::Week => format!("Semaine {}, {}", dt.iso_week().week(), dt.iso_week().year()),
        DateInterval::Day => format!("{} {} {}", dt.day(), month_name(dt), dt.year()),
        DateInterval::Hour => format!("{} {}h", short_date(dt), dt.hour()),
        DateInterval::Minute => format!("{} {:02}:{:02}", short_date(dt), dt.hour(), dt.minute()),
    }
}

/// Best-effort date rendering for table cells. Date-only strings get the long
/// day form, datetime strings the short date + time form; anything that does
/// not look like a date passes through untouched.
pub fn format_cell(text: &str) -> String {
    let trimmed = text.trim();
    let Some(dt) = parse_date_str(trimmed) else {
        return text.to_string();
    };
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        format!("{} {} {}", dt.day(), month_name(dt), dt.year())
    } else {
        format!("{} {:02}:{:02}", short_date(dt), dt.hour(), dt.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_passthrough() {
        assert_eq!(format_date_key("2024", DateInterval::Year), "2024");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(format_date_key("2024-01", DateInterval::Month), "janvier 2024");
        assert_eq!(format_date_key("2024-02", DateInterval::Month), "février 2024");
        assert_eq!(format_date_key("2024-08", DateInterval::Month), "août 2024");
    }

    #[test]
    fn test_week_label() {
        assert_eq!(format_date_key("2024-W03", DateInterval::Week), "Semaine 3, 2024");
        assert_eq!(format_date_key("2022-W52", DateInterval::Week), "Semaine 52, 2022");
    }

    #[test]
    fn test_day_label() {
        assert_eq!(format_date_key("2024-01-15", DateInterval::Day), "15 janvier 2024");
    }

    #[test]
    fn test_hour_and_minute_labels() {
        assert_eq!(
            format_date_key("2024-01-15T14", DateInterval::Hour),
            "15/01/2024 14h"
        );
        assert_eq!(
            format_date_key("2024-01-15T14:05", DateInterval::Minute),
            "15/01/2024 14:05"
        );
    }

    #[test]
    fn test_unparsable_key_returned_unchanged() {
        assert_eq!(format_date_key("garbage", DateInterval::Month), "garbage");
        assert_eq!(format_date_key("", DateInterval::Day), "");
    }

    #[test]
    fn test_format_cell_detects_dates() {
        assert_eq!(format_cell("2024-01-15"), "15 janvier 2024");
        assert_eq!(format_cell("2024-01-15T14:05:00Z"), "15/01/2024 14:05");
        assert_eq!(format_cell("hello"), "hello");
        assert_eq!(format_cell("12.5"), "12.5");
    }
}
