//! Calendar arithmetic on whole days (proleptic Gregorian, ISO dates).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CalcError, Result};
use crate::time::{civil_from_days, days_from_civil, weekday_from_days};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Year range of the `YYYY-MM-DD` form.
const MIN_YEAR: i64 = 0;
const MAX_YEAR: i64 = 9999;

/// Indexed from Sunday.
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i64, month: u32, day: u32) -> Result<Self> {
        let valid = (MIN_YEAR..=MAX_YEAR).contains(&year)
            && (1..=12).contains(&month)
            && day >= 1
            && day <= month_length(year, month);
        if !valid {
            return Err(CalcError::InvalidDateFormat(format!(
                "{year:04}-{month:02}-{day:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Days since 1970-01-01.
    pub fn to_days(self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    pub fn from_days(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self { year, month, day }
    }

    /// Shift by `days`. Fails when the result leaves the four-digit years
    /// the ISO form can express.
    pub fn add_days(self, days: i64) -> Result<Self> {
        let out_of_range = || CalcError::InvalidDateFormat(format!("{} + {} days", self, days));
        let target = self.to_days().checked_add(days).ok_or_else(out_of_range)?;
        let representable = days_from_civil(MIN_YEAR, 1, 1)..=days_from_civil(MAX_YEAR, 12, 31);
        if !representable.contains(&target) {
            return Err(out_of_range());
        }
        Ok(Self::from_days(target))
    }

    pub fn weekday_name(self) -> &'static str {
        WEEKDAY_NAMES[weekday_from_days(self.to_days()) as usize]
    }

    pub fn is_weekend(self) -> bool {
        matches!(weekday_from_days(self.to_days()), 0 | 6)
    }

    /// `January 5, 2024`
    pub fn long_format(self) -> String {
        format!(
            "{} {}, {}",
            MONTH_NAMES[(self.month - 1) as usize],
            self.day,
            self.year
        )
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CalcError::InvalidDateFormat(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let digits = |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());
        if !digits(y, 4) || !digits(m, 2) || !digits(d, 2) {
            return Err(invalid());
        }

        let year = y.parse().map_err(|_| invalid())?;
        let month = m.parse().map_err(|_| invalid())?;
        let day = d.parse().map_err(|_| invalid())?;
        CalendarDate::new(year, month, day).map_err(|_| invalid())
    }
}

pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i64, month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        return Err(CalcError::InvalidDateFormat(format!("month {month}")));
    }
    Ok(month_length(year, month))
}

fn month_length(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Weekdays in `start..=end`, both ends inclusive. Zero when `start > end`.
pub fn business_days(start: CalendarDate, end: CalendarDate) -> u32 {
    let (first, last) = (start.to_days(), end.to_days());
    if first > last {
        return 0;
    }
    (first..=last)
        .filter(|d| !matches!(weekday_from_days(*d), 0 | 6))
        .count() as u32
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateDifference {
    pub total_days: i64,
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub business_days: u32,
}

impl DateDifference {
    /// Approximate breakdown: 365-day years, 30-day months.
    pub fn between(a: CalendarDate, b: CalendarDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let total_days = end.to_days() - start.to_days();
        Self {
            total_days,
            years: total_days / 365,
            months: (total_days % 365) / 30,
            days: total_days % 30,
            business_days: business_days(start, end),
        }
    }

    /// `1 year, 2 months, 3 days`, or `0 days` when every part is zero.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            (self.years, "year"),
            (self.months, "month"),
            (self.days, "day"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n} {unit}{}", if n > 1 { "s" } else { "" }))
        .collect();

        if parts.is_empty() {
            "0 days".to_string()
        } else {
            parts.join(", ")
        }
    }
}

pub fn date_difference(a: &str, b: &str) -> Result<DateDifference> {
    Ok(DateDifference::between(a.parse()?, b.parse()?))
}

/// ISO date `days` after `date` (negative goes back).
pub fn add_days(date: &str, days: i64) -> Result<String> {
    Ok(date.parse::<CalendarDate>()?.add_days(days)?.to_string())
}

pub fn subtract_days(date: &str, days: i64) -> Result<String> {
    let back = days
        .checked_neg()
        .ok_or_else(|| CalcError::InvalidDateFormat(format!("{date} - {days} days")))?;
    add_days(date, back)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let d = date("2024-01-05");
        assert_eq!((d.year, d.month, d.day), (2024, 1, 5));
        assert_eq!(d.to_string(), "2024-01-05");
        assert_eq!(d.long_format(), "January 5, 2024");
        assert_eq!(d.weekday_name(), "Friday");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in ["", "2024-1-05", "2024/01/05", "2023-02-29", "2024-13-01", "abcd-ef-gh", "2024-01-00"] {
            assert_eq!(
                s.parse::<CalendarDate>(),
                Err(CalcError::InvalidDateFormat(s.to_string())),
                "{s:?}"
            );
        }
        assert!("2024-02-29".parse::<CalendarDate>().is_ok());
    }

    #[test]
    fn test_add_and_subtract() {
        assert_eq!(add_days("2024-02-28", 1).unwrap(), "2024-02-29");
        assert_eq!(add_days("2023-12-31", 1).unwrap(), "2024-01-01");
        assert_eq!(subtract_days("2024-03-01", 1).unwrap(), "2024-02-29");
        assert_eq!(add_days("2024-01-01", 366).unwrap(), "2025-01-01");
        assert!(add_days("not-a-date", 1).is_err());
    }

    #[test]
    fn test_shift_stays_within_four_digit_years() {
        assert!(matches!(
            add_days("2024-01-01", i64::MAX),
            Err(CalcError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            add_days("2024-01-01", i64::MIN),
            Err(CalcError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            subtract_days("2024-01-01", i64::MIN),
            Err(CalcError::InvalidDateFormat(_))
        ));
        assert!(subtract_days("2024-01-01", i64::MAX).is_err());
        assert!(add_days("9999-12-31", 1).is_err());
        assert!(subtract_days("0000-01-01", 1).is_err());

        let last = add_days("9999-12-30", 1).unwrap();
        assert_eq!(last, "9999-12-31");
        assert!(last.parse::<CalendarDate>().is_ok());
        assert_eq!(subtract_days("0000-01-02", 1).unwrap(), "0000-01-01");
        assert!(CalendarDate::new(10_000, 1, 1).is_err());
    }

    #[test]
    fn test_difference_description() {
        let diff = date_difference("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(diff.describe(), "0 days");

        let diff = date_difference("2024-01-01", "2024-01-02").unwrap();
        assert_eq!(diff.describe(), "1 day");

        // 400 days: 1 year, 35 % 365 / 30 = 1 month, 400 % 30 = 10 days
        let diff = date_difference("2020-01-01", "2021-02-04").unwrap();
        assert_eq!(diff.total_days, 400);
        assert_eq!(diff.describe(), "1 year, 1 month, 10 days");

        let reversed = date_difference("2021-02-04", "2020-01-01").unwrap();
        assert_eq!(reversed, diff);
    }

    #[test]
    fn test_business_days() {
        // Mon 2024-01-01 .. Sun 2024-01-07
        assert_eq!(business_days(date("2024-01-01"), date("2024-01-07")), 5);
        // single Saturday
        assert_eq!(business_days(date("2024-01-06"), date("2024-01-06")), 0);
        // single Monday
        assert_eq!(business_days(date("2024-01-01"), date("2024-01-01")), 1);
        assert_eq!(business_days(date("2024-01-07"), date("2024-01-01")), 0);
        assert_eq!(business_days(date("2024-01-01"), date("2024-01-31")), 23);
    }

    #[test]
    fn test_calendar_helpers() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2023, 4).unwrap(), 30);
        assert!(days_in_month(2023, 13).is_err());
    }
}
