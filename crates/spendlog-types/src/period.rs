//! Period bucketing for time-series charts
//!
//! Every expense falls into exactly one bucket per [`PeriodType`]. A bucket is
//! identified by the UTC calendar date it starts on:
//!
//! | Period | Bucket start | Label |
//! |--------|--------------|-------|
//! | day | the date itself | `2025-01-15` |
//! | week | Monday of the ISO week | `2025-W03` |
//! | month | first of the month | `2025-01` |
//! | year | January 1st | `2025` |

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Granularity of a time-series bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// First day of the bucket containing `at`, in UTC
    pub fn bucket_start(&self, at: DateTime<Utc>) -> NaiveDate {
        self.truncate(at.date_naive())
    }

    /// First day of the bucket containing `date`
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Display label for a bucket starting on `bucket`
    pub fn label(&self, bucket: NaiveDate) -> String {
        match self {
            Self::Day => bucket.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = bucket.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => bucket.format("%Y-%m").to_string(),
            Self::Year => bucket.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(ValidationError::InvalidPeriodType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("day".parse::<PeriodType>().unwrap(), PeriodType::Day);
        assert_eq!("Week".parse::<PeriodType>().unwrap(), PeriodType::Week);
        assert_eq!(" year ".parse::<PeriodType>().unwrap(), PeriodType::Year);
        assert!(matches!(
            "quarter".parse::<PeriodType>(),
            Err(ValidationError::InvalidPeriodType(_))
        ));
        assert_eq!(PeriodType::default(), PeriodType::Month);
    }

    #[test]
    fn test_truncate() {
        // 2025-01-15 is a Wednesday
        let wed = date(2025, 1, 15);
        assert_eq!(PeriodType::Day.truncate(wed), wed);
        assert_eq!(PeriodType::Week.truncate(wed), date(2025, 1, 13));
        assert_eq!(PeriodType::Month.truncate(wed), date(2025, 1, 1));
        assert_eq!(PeriodType::Year.truncate(wed), date(2025, 1, 1));

        let monday = date(2025, 1, 13);
        assert_eq!(PeriodType::Week.truncate(monday), monday);
        let sunday = date(2025, 1, 19);
        assert_eq!(PeriodType::Week.truncate(sunday), monday);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PeriodType::Day.label(date(2025, 1, 5)), "2025-01-05");
        assert_eq!(PeriodType::Month.label(date(2025, 1, 1)), "2025-01");
        assert_eq!(PeriodType::Year.label(date(2025, 1, 1)), "2025");
        assert_eq!(PeriodType::Week.label(date(2025, 1, 13)), "2025-W03");
    }

    #[test]
    fn test_week_label_uses_iso_year() {
        // Monday 2024-12-30 starts ISO week 1 of 2025
        let bucket = PeriodType::Week.truncate(date(2025, 1, 1));
        assert_eq!(bucket, date(2024, 12, 30));
        assert_eq!(PeriodType::Week.label(bucket), "2025-W01");
    }
}
