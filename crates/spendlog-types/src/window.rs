//! Inclusive date windows for scoping queries

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{ValidationError, ValidationResult};

/// Optional inclusive `[start, end]` bounds on `expense_date`.
///
/// A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> ValidationResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ValidationError::InvertedWindow {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Window with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The UTC calendar month `year-month`.
    ///
    /// The end bound is one microsecond before the next month starts, which is
    /// the finest resolution the store keeps.
    pub fn month(year: i32, month: u32) -> ValidationResult<Self> {
        ValidationError::check_range("year", year as i64, 2000, 2100)?;
        ValidationError::check_range("month", month as i64, 1, 12)?;

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ValidationError::InvalidDate(format!("{}-{:02}", year, month)))?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
            ValidationError::InvalidDate(format!("{}-{:02}", next_year, next_month))
        })?;

        let start = start_of_day(first);
        let end = start_of_day(next) - Duration::microseconds(1);
        Ok(Self { start: Some(start), end: Some(end) })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `at` falls inside the window, bounds included
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Parse a date bound given as RFC 3339 or as `YYYY-MM-DD` (midnight UTC).
pub fn parse_date_bound(s: &str) -> ValidationResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}
