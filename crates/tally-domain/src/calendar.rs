//! Calendar day keys and minute-resolution clock values used for grouping deliveries.

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

const DISPLAY_FORMAT: &str = "%Y-%m-%d";
const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// Year/month/day key used to group records and to step backwards or forwards in time.
///
/// Months are exposed 0-based (`0` is January). The value is always a real
/// calendar date; every constructor validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CalendarDay {
    date: NaiveDate,
}

impl CalendarDay {
    /// Builds a day from a year, a 0-based month and a day of month.
    pub fn new(year: i32, month: u32, day_of_month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.checked_add(1)?, day_of_month).map(Self::from_date)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Day on which the given wall-clock instant falls.
    pub fn from_datetime(instant: NaiveDateTime) -> Self {
        Self::from_date(instant.date())
    }

    /// Day of a Unix epoch timestamp in milliseconds, read as UTC wall-clock.
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|instant| Self::from_datetime(instant.naive_utc()))
    }

    /// Parses the `YYYY-MM-DD` display form.
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDate::parse_from_str(value.trim(), DISPLAY_FORMAT)
            .ok()
            .map(Self::from_date)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// 0-based month.
    pub fn month(&self) -> u32 {
        self.date.month0()
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn as_date(&self) -> NaiveDate {
        self.date
    }

    /// Shifts the day by `n` calendar days. Returns `None` outside the supported date range.
    pub fn add_days(&self, n: i64) -> Option<Self> {
        let step = Days::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            self.date.checked_add_days(step)
        } else {
            self.date.checked_sub_days(step)
        };
        shifted.map(Self::from_date)
    }

    pub fn previous(&self) -> Option<Self> {
        self.add_days(-1)
    }

    pub fn next(&self) -> Option<Self> {
        self.add_days(1)
    }

    /// 00:00:00 on this day.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    /// 23:59:59 on this day.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.start_of_day() + Duration::seconds(LAST_SECOND_OF_DAY)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        Self::from_datetime(instant) == *self
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            self.month() + 1,
            self.day_of_month()
        )
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        day.to_string()
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid calendar day `{value}`"))
    }
}

/// Minute-resolution clock value.
///
/// Hours run `0..=24` so that end-of-day boundaries can be written as `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn from_datetime(instant: NaiveDateTime) -> Self {
        Self::new(instant.hour(), instant.minute())
    }

    /// Minute-of-day projection in which `00:00` and `00:30` sort after every
    /// other time of the same working day (`1440` and `1470`).
    pub fn comparable_minutes(&self) -> u32 {
        match (self.hour, self.minute) {
            (0, 0) => 24 * 60,
            (0, 30) => 24 * 60 + 30,
            (hour, minute) => hour.saturating_mul(60).saturating_add(minute),
        }
    }

    /// Hours `0..=24`, minutes `0..=59`.
    pub fn is_valid(&self) -> bool {
        self.hour <= 24 && self.minute <= 59
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hour, self.minute) {
            (0 | 24, 0) => f.write_str("00:00"),
            (0 | 24, 30) => f.write_str("00:30"),
            (hour, minute) => write!(f, "{hour:02}:{minute:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn months_are_zero_based() {
        let march = CalendarDay::new(2024, 2, 15).expect("valid day");
        assert_eq!(march.month(), 2);
        assert_eq!(march.as_date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(march.to_string(), "2024-03-15");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(CalendarDay::new(2023, 1, 29).is_none());
        assert!(CalendarDay::new(2024, 12, 1).is_none());
        assert!(CalendarDay::new(2024, u32::MAX, 1).is_none());
    }

    #[test]
    fn add_days_crosses_month_and_year_boundaries() {
        assert_eq!(day(2024, 12, 31).add_days(1), Some(day(2025, 1, 1)));
        assert_eq!(day(2024, 3, 1).add_days(-1), Some(day(2024, 2, 29)));
        assert_eq!(day(2024, 3, 1).add_days(0), Some(day(2024, 3, 1)));
        assert!(CalendarDay::from_date(NaiveDate::MAX).next().is_none());
    }

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let d = day(2024, 5, 10);
        assert_eq!(d.start_of_day().to_string(), "2024-05-10 00:00:00");
        assert_eq!(d.end_of_day().to_string(), "2024-05-10 23:59:59");
        assert!(d.contains(d.end_of_day()));
    }

    #[test]
    fn parses_display_form_and_millis() {
        assert_eq!(CalendarDay::parse("2025-01-09"), Some(day(2025, 1, 9)));
        assert!(CalendarDay::parse("09/01/2025").is_none());
        assert_eq!(
            CalendarDay::from_timestamp_millis(1_700_000_000_000),
            Some(day(2023, 11, 14))
        );
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&day(2024, 7, 4)).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day(2024, 7, 4));
        assert!(serde_json::from_str::<CalendarDay>("\"2024-13-01\"").is_err());
    }

    #[test]
    fn midnight_sorts_after_the_working_day() {
        assert_eq!(TimeOfDay::new(0, 0).comparable_minutes(), 1440);
        assert_eq!(TimeOfDay::new(0, 30).comparable_minutes(), 1470);
        assert_eq!(TimeOfDay::new(0, 15).comparable_minutes(), 15);
        assert_eq!(TimeOfDay::new(23, 59).comparable_minutes(), 1439);
    }

    #[test]
    fn displays_midnight_variants_as_clock_time() {
        assert_eq!(TimeOfDay::new(24, 0).to_string(), "00:00");
        assert_eq!(TimeOfDay::new(0, 30).to_string(), "00:30");
        assert_eq!(TimeOfDay::new(9, 5).to_string(), "09:05");
    }

    #[test]
    fn out_of_range_values_are_invalid_and_do_not_overflow() {
        let absurd = TimeOfDay::new(u32::MAX, 0);
        assert!(!absurd.is_valid());
        assert_eq!(absurd.comparable_minutes(), u32::MAX);
        assert!(!TimeOfDay::new(12, 60).is_valid());
        assert!(TimeOfDay::new(24, 0).is_valid());
    }
}
