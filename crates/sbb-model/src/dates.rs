//! Calendar primitives
//!
//! - [`DateRange`]: inclusive `[from, to]`, normalized on construction
//! - [`YearMonth`]: the month shown by the calendar, with navigation

use crate::error::ParseError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive date range with `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl From<RawRange> for DateRange {
    fn from(raw: RawRange) -> Self {
        Self::new(raw.from, raw.to)
    }
}

impl DateRange {
    /// Build a range from two endpoints given in either order
    #[inline]
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// One-day range `[day, day]`
    #[inline]
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// First day (inclusive)
    #[inline]
    #[must_use]
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day (inclusive)
    #[inline]
    #[must_use]
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Whether two inclusive ranges share at least one day
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    /// Number of days covered, endpoints included
    #[must_use]
    pub fn len_days(&self) -> u64 {
        (self.to - self.from).num_days().unsigned_abs() + 1
    }

    /// Every day of the range in chronological order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Month `month` (1-12) of `year`
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Month containing `date`
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // day 1 always exists for a month that contains `date`
        let first = date.with_day(1).unwrap_or(date);
        Self { first }
    }

    #[inline]
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12
    #[inline]
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    #[inline]
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next_first()
            .and_then(|n| n.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Calendar length of the month (28-31)
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Following month (saturates at the last representable month)
    #[must_use]
    pub fn next(self) -> Self {
        self.next_first().map_or(self, |first| Self { first })
    }

    /// Preceding month (saturates at the first representable month)
    #[must_use]
    pub fn prev(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    /// Human label, e.g. `June 2025`
    #[must_use]
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    fn next_first(&self) -> Option<NaiveDate> {
        self.first.checked_add_months(Months::new(1))
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(|first| Self { first })
            .map_err(|_| ParseError::Month(s.to_string()))
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn range_normalizes_reverse_endpoints() {
        let range = DateRange::new(d("2025-08-03"), d("2025-08-01"));
        assert_eq!(range.from(), d("2025-08-01"));
        assert_eq!(range.to(), d("2025-08-03"));
        assert_eq!(range.len_days(), 3);
    }

    #[test]
    fn range_days_inclusive() {
        let days: Vec<_> = DateRange::new(d("2025-02-27"), d("2025-03-01")).days().collect();
        assert_eq!(days, vec![d("2025-02-27"), d("2025-02-28"), d("2025-03-01")]);
    }

    #[test]
    fn range_overlap_edges() {
        let a = DateRange::new(d("2025-07-01"), d("2025-07-05"));
        assert!(a.overlaps(&DateRange::single(d("2025-07-05"))));
        assert!(!a.overlaps(&DateRange::single(d("2025-07-06"))));
    }

    #[test]
    fn range_deserialize_normalizes() {
        let range: DateRange =
            serde_json::from_str(r#"{"from":"2025-08-03","to":"2025-08-01"}"#).unwrap();
        assert_eq!(range.from(), d("2025-08-01"));
    }

    #[test]
    fn month_navigation_crosses_years() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2025, 6).unwrap().days_in_month(), 30);
        assert_eq!(YearMonth::new(2025, 7).unwrap().days_in_month(), 31);
    }

    #[test]
    fn month_parse_and_display() {
        let month: YearMonth = "2025-06".parse().unwrap();
        assert_eq!(month.to_string(), "2025-06");
        assert_eq!(month.label(), "June 2025");
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth::of(d("2025-06-17")), month);
    }
}
