//! Lightweight UTC calendar utilities (no chrono dependency).
//!
//! Uses Howard Hinnant's civil_from_days / days_from_civil algorithms for
//! conversions between Unix epoch days and proleptic Gregorian dates.

use std::time::{SystemTime, UNIX_EPOCH};

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Current UTC time as Unix milliseconds.
pub fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Unix milliseconds → `YYYY-MM-DD` (UTC).
pub fn millis_to_date_string(millis: u64) -> String {
    let (y, m, d) = civil_from_days((millis / MILLIS_PER_DAY) as i64);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Unix milliseconds → `HH:MM:SS` (UTC).
pub fn millis_to_time_string(millis: u64) -> String {
    let secs = (millis % MILLIS_PER_DAY) / 1000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Unix milliseconds → `YYYY-MM-DD HH:MM:SS UTC`.
pub fn millis_to_timestamp_string(millis: u64) -> String {
    format!(
        "{} {} UTC",
        millis_to_date_string(millis),
        millis_to_time_string(millis)
    )
}

/// Howard Hinnant's civil_from_days: Unix epoch days → (year, month, day).
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m as u32, d as u32)
}

/// Inverse of [`civil_from_days`]: (year, month, day) → Unix epoch days.
pub fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u64;
    let m = month as u64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as u64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe as i64 - 719468
}

/// Day of week for epoch days, 0 = Sunday … 6 = Saturday.
pub fn weekday_from_days(days: i64) -> u32 {
    // 1970-01-01 was a Thursday
    (days + 4).rem_euclid(7) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch() {
        assert_eq!(millis_to_date_string(0), "1970-01-01");
        assert_eq!(millis_to_time_string(0), "00:00:00");
    }

    #[test]
    fn test_known_instant() {
        // 2026-02-21T13:45:30Z = 1771681530 seconds
        let millis = 1_771_681_530_000;
        assert_eq!(millis_to_date_string(millis), "2026-02-21");
        assert_eq!(millis_to_time_string(millis), "13:45:30");
        assert_eq!(
            millis_to_timestamp_string(millis),
            "2026-02-21 13:45:30 UTC"
        );
    }

    #[test]
    fn test_days_roundtrip() {
        for days in [-719468, -1, 0, 1, 11016, 19782, 20505, 100_000] {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), days, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn test_weekday() {
        assert_eq!(weekday_from_days(0), 4); // Thursday
        assert_eq!(weekday_from_days(days_from_civil(2024, 1, 1)), 1); // Monday
        assert_eq!(weekday_from_days(-1), 3);
    }

    #[test]
    fn test_now_is_recent() {
        let date = millis_to_date_string(now_unix_millis());
        assert!(date.starts_with("20"), "date should be in 2000s: {date}");
    }
}
