// src/dates.rs
//! Publication-date normalization.

use chrono::{DateTime, Local, NaiveDateTime};

/// Canonical rendering for every publication date in the store.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a feed timestamp into `YYYY-MM-DD HH:MM:SS`.
///
/// Tries the known syndication formats in order; the first match wins and
/// is rendered with its own clock fields, exactly as the feed advertised
/// them. Unparseable or empty input falls back to the current wall-clock
/// time, a deliberate policy; callers must not read the fallback as
/// "unknown time".
pub fn normalize_date(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return now_canonical();
    }

    // RFC-822 family ("Mon, 02 Jan 2025 10:00:00 GMT" / "+0000"). The
    // leading weekday is advisory only; feeds get it wrong often enough
    // that it must not veto an otherwise-valid date.
    let rest = strip_weekday(trimmed);
    if let Ok(dt) = DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z") {
        return dt.format(CANONICAL_FORMAT).to_string();
    }
    if let Some(day_time) = rest.strip_suffix("GMT") {
        if let Ok(dt) = NaiveDateTime::parse_from_str(day_time.trim_end(), "%d %b %Y %H:%M:%S") {
            return dt.format(CANONICAL_FORMAT).to_string();
        }
    }

    // ISO-8601 with offset.
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z") {
        return dt.format(CANONICAL_FORMAT).to_string();
    }

    // Offset-free shapes: plain date-time, then day-month-year.
    for fmt in ["%Y-%m-%d %H:%M:%S", "%d %b %Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(rest, fmt) {
            return dt.format(CANONICAL_FORMAT).to_string();
        }
    }

    tracing::debug!(input = %trimmed, "unrecognized publication date, using ingestion time");
    now_canonical()
}

/// Current wall-clock time in the canonical representation.
pub fn now_canonical() -> String {
    Local::now().format(CANONICAL_FORMAT).to_string()
}

fn strip_weekday(s: &str) -> &str {
    match s.split_once(',') {
        Some((day, rest)) if day.len() == 3 && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(s: &str) -> bool {
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
        re.is_match(s)
    }

    #[test]
    fn rfc822_with_zone_name() {
        assert_eq!(
            normalize_date(Some("Mon, 02 Jan 2025 10:00:00 GMT")),
            "2025-01-02 10:00:00"
        );
    }

    #[test]
    fn rfc822_weekday_is_advisory_not_validated() {
        // 2025-01-02 was a Thursday; the stamped weekday must not matter.
        assert_eq!(
            normalize_date(Some("Thu, 02 Jan 2025 10:00:00 GMT")),
            normalize_date(Some("Mon, 02 Jan 2025 10:00:00 GMT"))
        );
    }

    #[test]
    fn rfc822_with_numeric_offset() {
        assert_eq!(
            normalize_date(Some("Tue, 11 Mar 2025 08:15:30 +0530")),
            "2025-03-11 08:15:30"
        );
    }

    #[test]
    fn iso8601_with_offset() {
        assert_eq!(
            normalize_date(Some("2025-01-02T10:00:00+0000")),
            "2025-01-02 10:00:00"
        );
    }

    #[test]
    fn plain_date_time_passes_through() {
        assert_eq!(
            normalize_date(Some("2025-06-30 23:59:59")),
            "2025-06-30 23:59:59"
        );
    }

    #[test]
    fn day_month_year_shape() {
        assert_eq!(
            normalize_date(Some("02 Jan 2025 10:00:00")),
            "2025-01-02 10:00:00"
        );
    }

    #[test]
    fn empty_input_falls_back_to_now() {
        assert!(is_canonical(&normalize_date(Some(""))));
        assert!(is_canonical(&normalize_date(None)));
    }

    #[test]
    fn garbage_input_falls_back_to_now() {
        assert!(is_canonical(&normalize_date(Some("yesterday-ish"))));
    }
}
