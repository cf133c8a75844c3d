use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse an ISO-8601 date or timestamp into a UTC instant.
///
/// Accepts RFC 3339 timestamps (`2024-03-15T10:00:00Z`, with any offset),
/// naive timestamps (`2024-03-15T10:00:00`, read as UTC) and bare dates
/// (`2024-03-15`, read as midnight UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse an ISO-8601 value and truncate it to its UTC calendar day.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    parse_instant(value).map(|instant| instant.date_naive())
}

/// Whole days from `from` to `to`, rounding any partial day up.
/// Negative when `to` precedes `from`.
pub fn ceil_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        let instant = parse_instant("2024-01-06").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-06T00:00:00+00:00");
    }

    #[test]
    fn truncates_offset_timestamps_to_the_utc_day() {
        assert_eq!(
            parse_day("2024-03-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 3, 16)
        );
        assert_eq!(
            parse_day("2024-03-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_day("2024-03-15T10:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("not a date").is_none());
        assert!(parse_instant("2024-13-01").is_none());
        assert!(parse_instant("").is_none());
    }

    #[test]
    fn ceil_days_rounds_partial_days_up() {
        let start = parse_instant("2024-01-01").unwrap();
        assert_eq!(ceil_days(start, parse_instant("2024-01-11").unwrap()), 10);
        assert_eq!(ceil_days(start, parse_instant("2024-01-01T00:00:01Z").unwrap()), 1);
        assert_eq!(ceil_days(start, start), 0);
        assert_eq!(ceil_days(start, parse_instant("2023-12-30").unwrap()), -2);
        assert_eq!(ceil_days(start, parse_instant("2023-12-31T12:00:00Z").unwrap()), 0);
    }
}
