use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

// ── Sent Date parsing ─────────────────────────────────────────────────────────

/// Date-time layouts seen in point-of-sale exports, tried in order.
///
/// Slash dates are month-first. Two-digit years come before `%Y`, which
/// would otherwise accept `24` as the year 24.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Date-only layouts; the time component becomes midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Best-effort parse of a `Sent Date` cell into a wall-clock timestamp.
///
/// Never fails: empty or unrecognised input yields `None`, the "missing"
/// marker. Values carrying a UTC offset keep their local wall-clock time.
pub fn parse_sent_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    debug!("could not parse Sent Date \"{}\"", s);
    None
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// Every calendar day from `start` to `end`, both inclusive.
///
/// Empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            parse_sent_date("2024-04-01 11:32:00"),
            Some(dt(2024, 4, 1, 11, 32))
        );
        assert_eq!(
            parse_sent_date("2024-04-01T11:32:00"),
            Some(dt(2024, 4, 1, 11, 32))
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let parsed = parse_sent_date("2024-04-01T11:32:00-04:00").unwrap();
        assert_eq!(parsed.hour(), 11);
        let parsed = parse_sent_date("2024-04-01T11:32:00Z").unwrap();
        assert_eq!(parsed.hour(), 11);
    }

    #[test]
    fn test_parse_us_slash_formats() {
        assert_eq!(
            parse_sent_date("4/1/2024 11:32"),
            Some(dt(2024, 4, 1, 11, 32))
        );
        assert_eq!(
            parse_sent_date("04/01/2024 1:05 PM"),
            Some(dt(2024, 4, 1, 13, 5))
        );
        assert_eq!(
            parse_sent_date("10/31/24 9:15 AM"),
            Some(dt(2024, 10, 31, 9, 15))
        );
    }

    #[test]
    fn test_parse_month_first_for_slash_dates() {
        // 5/6 is May 6th, not June 5th.
        assert_eq!(parse_sent_date("5/6/2024 12:00"), Some(dt(2024, 5, 6, 12, 0)));
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_sent_date("2024-07-04"), Some(dt(2024, 7, 4, 0, 0)));
        assert_eq!(parse_sent_date("7/4/2024"), Some(dt(2024, 7, 4, 0, 0)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            parse_sent_date("  2024-04-01 11:32:00 "),
            Some(dt(2024, 4, 1, 11, 32))
        );
    }

    #[test]
    fn test_parse_malformed_is_missing() {
        assert!(parse_sent_date("").is_none());
        assert!(parse_sent_date("   ").is_none());
        assert!(parse_sent_date("not a date").is_none());
        assert!(parse_sent_date("13/45/2024 99:99").is_none());
    }

    #[test]
    fn test_days_between_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 29).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let days = days_between(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], start);
        assert_eq!(days[3], end);
    }

    #[test]
    fn test_days_between_single_and_reversed() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(days_between(day, day), vec![day]);
        let before = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(days_between(day, before).is_empty());
    }
}
