//! Report types
//!
//! Response-ready shapes produced by the engine. Monetary values and
//! percentages are already rounded to two decimal places and serialize as
//! decimal strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendlog_types::{Expense, ExpenseCategory, PeriodType};

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: ExpenseCategory,
    pub total_amount: Decimal,
    pub expense_count: i64,
}

/// Overall spending inside an optional date window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_spending: Decimal,
    pub expense_count: i64,
    pub category_breakdown: Vec<CategorySpending>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Statistics for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatistics {
    /// `YYYY-MM`
    pub period: String,
    pub total_spending: Decimal,
    pub average_expense: Decimal,
    pub expense_count: i64,
    /// `None` when the month has no expenses
    pub top_category: Option<ExpenseCategory>,
    pub top_category_amount: Option<Decimal>,
}

/// One bucket of a spending time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub period: String,
    pub total_amount: Decimal,
    pub expense_count: i64,
}

/// Time-series chart, oldest bucket first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartVisualization {
    pub period_type: PeriodType,
    pub data_points: Vec<ChartDataPoint>,
    pub total_periods: usize,
    pub total_spending: Decimal,
    /// Mean spend per returned period
    pub average_spending: Decimal,
}

/// One slice of the category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChartData {
    pub category: ExpenseCategory,
    pub total_amount: Decimal,
    pub expense_count: i64,
    pub percentage: Decimal,
}

/// Category share chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChart {
    pub categories: Vec<CategoryChartData>,
    pub total_spending: Decimal,
    pub total_expenses: i64,
}

/// One page of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Every selectable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<ExpenseCategory>,
    pub total: usize,
}

impl CategoryList {
    pub fn all() -> Self {
        Self {
            categories: ExpenseCategory::ALL.to_vec(),
            total: ExpenseCategory::ALL.len(),
        }
    }
}
