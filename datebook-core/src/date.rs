//! Date comparison and formatting helpers.
//!
//! Time zones are not modelled: every value is a wall-clock reading.

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{DatebookError, DatebookResult};

/// Same calendar day, ignoring time-of-day.
pub fn is_same_date(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

pub fn is_same_month(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// "Month YYYY" label, e.g. "January 2024".
pub fn format_month_year(date: &impl Datelike) -> String {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or_default();

    format!("{} {}", month, date.year())
}

/// Zero padded "HH:MM".
pub fn format_time(time: &impl Timelike) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse a form date (YYYY-MM-DD).
pub fn parse_date(s: &str) -> DatebookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DatebookError::InvalidDate(s.to_string()))
}

/// Parse a form time of day (HH:MM, seconds optional).
pub fn parse_time(s: &str) -> DatebookResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| DatebookError::InvalidDate(s.to_string()))
}

/// Parse any timestamp representation we persist or receive.
///
/// Accepts plain dates, naive date-times and RFC 3339. Offsets are dropped,
/// keeping the wall-clock reading written in the string.
pub fn parse_date_time(s: &str) -> DatebookResult<NaiveDateTime> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .map_err(|_| DatebookError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    #[test]
    fn test_same_date_ignores_time_of_day() {
        assert!(is_same_date(&dt("2024-01-01T00:00"), &dt("2024-01-01T23:59")));
        assert!(!is_same_date(&dt("2024-01-01T23:59"), &dt("2024-01-02T00:00")));
    }

    #[test]
    fn test_same_month_requires_same_year() {
        let a = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let c = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert!(is_same_month(&a, &b));
        assert!(!is_same_month(&a, &c));
    }

    #[test]
    fn test_format_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_month_year(&date), "January 2024");
    }

    #[test]
    fn test_format_time_pads() {
        assert_eq!(format_time(&dt("2024-01-01T07:05:00")), "07:05");
    }

    #[test]
    fn test_parse_date_time_variants() {
        assert_eq!(dt("2024-01-01"), dt("2024-01-01T00:00:00"));
        assert_eq!(dt("2024-01-01T09:30"), dt("2024-01-01T09:30:00.000"));
        assert_eq!(dt("2024-01-01T09:30:00Z"), dt("2024-01-01T09:30"));
        assert_eq!(dt("2024-01-01T09:30:00+05:00"), dt("2024-01-01T09:30"));
        assert!(parse_date_time("not a date").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(format_time(&parse_time("14:45").unwrap()), "14:45");
        assert!(parse_time("25:00").is_err());
    }
}
