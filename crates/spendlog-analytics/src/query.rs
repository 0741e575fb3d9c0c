//! Query parameters and their bounds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spendlog_db::ExpenseFilter;
use spendlog_types::{DateWindow, ExpenseCategory, PeriodType, ValidationError, ValidationResult};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_CHART_LIMIT: i64 = 12;
pub const MAX_CHART_LIMIT: i64 = 100;

/// Expense listing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> i64 { 1 }
fn default_page_size() -> i64 { DEFAULT_PAGE_SIZE }

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            category: None,
            start: None,
            end: None,
            search: None,
        }
    }
}

impl ListQuery {
    /// Check bounds and turn the filters into a store filter
    pub fn validate(&self) -> ValidationResult<ExpenseFilter> {
        ValidationError::check_range("page", self.page, 1, i64::MAX)?;
        ValidationError::check_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        let window = DateWindow::new(self.start, self.end)?;
        let search = self
            .search
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ExpenseFilter {
            category: self.category,
            window,
            search,
        })
    }

    /// Rows to skip for the requested page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }
}

/// Number of pages needed for `total` rows; zero when there are no rows
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Time-series chart parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub period_type: PeriodType,
    #[serde(default = "default_chart_limit")]
    pub limit: i64,
}

fn default_chart_limit() -> i64 { DEFAULT_CHART_LIMIT }

impl Default for ChartQuery {
    fn default() -> Self {
        Self {
            period_type: PeriodType::default(),
            limit: DEFAULT_CHART_LIMIT,
        }
    }
}

impl ChartQuery {
    /// Parse raw parameters, applying the defaults for anything missing
    pub fn parse(period_type: Option<&str>, limit: Option<i64>) -> ValidationResult<Self> {
        let period_type = match period_type {
            Some(token) => token.parse()?,
            None => PeriodType::default(),
        };
        let query = Self {
            period_type,
            limit: limit.unwrap_or(DEFAULT_CHART_LIMIT),
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        ValidationError::check_range("limit", self.limit, 1, MAX_CHART_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(101, 50), 3);
    }

    #[test]
    fn test_offset() {
        let q = ListQuery { page: 1, page_size: 10, ..Default::default() };
        assert_eq!(q.offset(), 0);
        let q = ListQuery { page: 3, page_size: 20, ..Default::default() };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_list_bounds() {
        assert!(ListQuery::default().validate().is_ok());
        assert!(ListQuery { page: 0, ..Default::default() }.validate().is_err());
        assert!(ListQuery { page_size: 0, ..Default::default() }.validate().is_err());
        assert!(ListQuery { page_size: 101, ..Default::default() }.validate().is_err());
        assert!(ListQuery { page_size: 100, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let filter = ListQuery { search: Some("   ".into()), ..Default::default() }
            .validate()
            .unwrap();
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_chart_query_parse() {
        assert_eq!(ChartQuery::parse(None, None).unwrap(), ChartQuery::default());
        assert_eq!(ChartQuery::parse(Some("week"), Some(4)).unwrap().period_type, PeriodType::Week);
        assert!(matches!(
            ChartQuery::parse(Some("fortnight"), None),
            Err(ValidationError::InvalidPeriodType(_))
        ));
        assert!(ChartQuery::parse(None, Some(0)).is_err());
        assert!(ChartQuery::parse(None, Some(101)).is_err());
        assert!(ChartQuery::parse(None, Some(100)).is_ok());
    }
}
