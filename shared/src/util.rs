use chrono::{NaiveDateTime, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a WooCommerce timestamp (`2024-05-01T12:30:00`, optionally with
/// fractional seconds or a trailing `Z`).
pub fn parse_woo_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Format a timestamp the way WooCommerce expects in `after`/`before` filters
pub fn format_woo_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_woo_timestamps() {
        let dt = parse_woo_datetime("2024-05-01T12:30:00").unwrap();
        assert_eq!(format_woo_datetime(dt), "2024-05-01T12:30:00");
        assert!(parse_woo_datetime("2024-05-01T12:30:00.123Z").is_some());
        assert!(parse_woo_datetime("yesterday").is_none());
    }
}
