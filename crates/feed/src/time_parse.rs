// ABOUTME: Lenient date parsing for feed pubDate/updated values.
// ABOUTME: Tries RFC 3339, RFC 2822, named timezones, then loose fallback formats.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Parses a feed datetime string, trying the formats podcast feeds
/// actually carry. Returns None when nothing matches; callers substitute
/// the epoch default rather than failing the parse.
pub fn parse_feed_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Atom dates are RFC 3339.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // RSS pubDate is nominally RFC 2822.
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_named_timezone(s) {
        return Some(dt);
    }

    // Numeric-offset shapes the RFC parsers reject: single-digit day,
    // missing weekday, compact ISO offset.
    const OFFSET_FORMATS: [&str; 4] = [
        "%a, %e %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M:%S %z",
        "%e %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%z",
    ];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // No timezone at all: read as UTC.
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%a, %d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M:%S",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive));
    }

    None
}

/// RFC 1123 strings ending in a timezone abbreviation; chrono's %Z does
/// not parse these.
fn parse_named_timezone(s: &str) -> Option<DateTime<Utc>> {
    const OFFSETS: [(&str, i32); 12] = [
        ("GMT", 0),
        ("UTC", 0),
        ("UT", 0),
        ("EST", -5 * 3600),
        ("EDT", -4 * 3600),
        ("CST", -6 * 3600),
        ("CDT", -5 * 3600),
        ("MST", -7 * 3600),
        ("MDT", -6 * 3600),
        ("PST", -8 * 3600),
        ("PDT", -7 * 3600),
        ("CET", 3600),
    ];

    let (name, offset_secs) = OFFSETS.iter().find(|(name, _)| s.ends_with(name))?;
    let base = s.trim_end_matches(name).trim_end();

    const BASE_FORMATS: [&str; 3] = [
        "%a, %d %b %Y %H:%M:%S",
        "%a, %e %b %Y %H:%M:%S",
        "%d %b %Y %H:%M:%S",
    ];
    for fmt in BASE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(base, fmt) {
            let offset = FixedOffset::east_opt(*offset_secs)?;
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rfc3339() {
        let dt = parse_feed_datetime("2023-06-15T14:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_rfc2822_numeric_offset() {
        let dt = parse_feed_datetime("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
        // -0700 puts 15:04:05 local at 22:04:05 UTC.
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_named_timezone() {
        let dt = parse_feed_datetime("Mon, 02 Jan 2006 15:04:05 PST").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 23, 4, 5).unwrap());
    }

    #[test]
    fn test_missing_weekday() {
        assert!(parse_feed_datetime("02 Jan 2006 15:04:05 -0700").is_some());
    }

    #[test]
    fn test_naive_datetime_reads_as_utc() {
        let dt = parse_feed_datetime("2006-01-02 15:04:05").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn test_date_only() {
        let dt = parse_feed_datetime("2023-12-25").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_and_invalid_return_none() {
        assert!(parse_feed_datetime("").is_none());
        assert!(parse_feed_datetime("   ").is_none());
        assert!(parse_feed_datetime("not a date").is_none());
    }
}
