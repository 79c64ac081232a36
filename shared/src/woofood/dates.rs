//! Date and time parsing for delivery metadata

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Textual date formats, tried in order. `%b` also accepts full month names.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p"];

const RANGE_SEPARATORS: &[char] = &['-', '–', '~', '到', '至'];

/// Millisecond timestamps are at least this large
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Parse a textual delivery date.
///
/// A date followed by a time (`2024-05-01 18:00`) is accepted; any other
/// trailing text rejects the format. Returns `None` when nothing matches.
pub fn parse_delivery_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(raw, fmt).ok()?;
        let rest_ok = rest.is_empty() || rest.starts_with([' ', 'T']);
        (rest_ok && (1900..=2200).contains(&date.year())).then_some(date)
    })
}

/// Parse a Unix timestamp (seconds or milliseconds) into a store-local date
pub fn parse_unix_date(raw: &str, tz: Tz) -> Option<NaiveDate> {
    let value: i64 = raw.trim().split('.').next()?.parse().ok()?;
    if value <= 0 {
        return None;
    }

    let utc = if value >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)?
    } else {
        DateTime::from_timestamp(value, 0)?
    };
    Some(utc.with_timezone(&tz).date_naive())
}

/// Start of a time window such as `18:00 - 18:30`, `6:30 PM~7:00 PM`
/// or `18:00到18:30`
pub fn parse_time_window_start(raw: &str) -> Option<NaiveTime> {
    let start = raw.split(RANGE_SEPARATORS).next()?.trim();
    if start.is_empty() {
        return None;
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(start, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_formats_in_priority_order() {
        assert_eq!(parse_delivery_date("2024-05-01"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_delivery_date("2024/05/01"), Some(ymd(2024, 5, 1)));
        // month-first wins when both readings are valid
        assert_eq!(parse_delivery_date("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_delivery_date("25/05/2024"), Some(ymd(2024, 5, 25)));
        assert_eq!(parse_delivery_date("05-01-2024"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_delivery_date("May 1, 2024"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_delivery_date("May 1 2024"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_delivery_date("September 12, 2024"), Some(ymd(2024, 9, 12)));
    }

    #[test]
    fn test_date_with_trailing_time() {
        assert_eq!(parse_delivery_date("2024-05-01 18:30"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_delivery_date("2024-05-01T18:30:00"), Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_delivery_date(""), None);
        assert_eq!(parse_delivery_date("tomorrow"), None);
        assert_eq!(parse_delivery_date("13/13/2024"), None);
        assert_eq!(parse_delivery_date("2024-02-30"), None);
    }

    #[test]
    fn test_unix_dates() {
        // 2024-05-01T00:00:00Z
        assert_eq!(parse_unix_date("1714521600", Tz::UTC), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_unix_date("1714521600000", Tz::UTC), Some(ymd(2024, 5, 1)));
        // Still April 30th in New York
        assert_eq!(
            parse_unix_date("1714521600", chrono_tz::America::New_York),
            Some(ymd(2024, 4, 30))
        );
        assert_eq!(parse_unix_date("0", Tz::UTC), None);
        assert_eq!(parse_unix_date("soon", Tz::UTC), None);
    }

    #[test]
    fn test_time_window_start() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(parse_time_window_start("18:00 - 18:30"), Some(t(18, 0)));
        assert_eq!(parse_time_window_start("9:15"), Some(t(9, 15)));
        assert_eq!(parse_time_window_start("6:30 PM~7:00 PM"), Some(t(18, 30)));
        assert_eq!(parse_time_window_start("11:00am – 11:30am"), Some(t(11, 0)));
        assert_eq!(parse_time_window_start("12:00到12:30"), Some(t(12, 0)));
        assert_eq!(parse_time_window_start("asap"), None);
    }
}
