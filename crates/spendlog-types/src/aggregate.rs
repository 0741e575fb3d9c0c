//! Grouped aggregate rows
//!
//! These are the shapes a store returns from its grouped queries. The folds
//! below compute the same rows from in-process records and are what the
//! in-memory store runs; the PostgreSQL store produces them with `GROUP BY`.
//! Values are unrounded.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DateWindow, Expense, ExpenseCategory, PeriodType};

/// Sum and count over a set of expenses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTotals {
    pub total: Decimal,
    pub count: i64,
}

impl SpendTotals {
    pub fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }
}

/// Sum and count for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Decimal,
    pub count: i64,
}

/// Sum and count for one period bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// First day of the bucket
    pub bucket: NaiveDate,
    pub total: Decimal,
    pub count: i64,
}

/// Overall sum and count of the expenses inside `window`
pub fn fold_totals<'a, I>(expenses: I, window: &DateWindow) -> SpendTotals
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut totals = SpendTotals::default();
    for expense in expenses.into_iter().filter(|e| window.contains(e.expense_date)) {
        totals.add(expense.amount);
    }
    totals
}

/// Per-category sums of the expenses inside `window`, in category order.
///
/// Categories with no expenses are omitted.
pub fn fold_by_category<'a, I>(expenses: I, window: &DateWindow) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut groups: BTreeMap<ExpenseCategory, SpendTotals> = BTreeMap::new();
    for expense in expenses.into_iter().filter(|e| window.contains(e.expense_date)) {
        groups.entry(expense.category).or_default().add(expense.amount);
    }
    groups
        .into_iter()
        .map(|(category, t)| CategoryTotal { category, total: t.total, count: t.count })
        .collect()
}

/// Per-bucket sums, oldest bucket first. Empty buckets are omitted.
pub fn fold_by_period<'a, I>(expenses: I, period: PeriodType) -> Vec<PeriodTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut groups: BTreeMap<NaiveDate, SpendTotals> = BTreeMap::new();
    for expense in expenses {
        groups
            .entry(period.bucket_start(expense.expense_date))
            .or_default()
            .add(expense.amount);
    }
    groups
        .into_iter()
        .map(|(bucket, t)| PeriodTotal { bucket, total: t.total, count: t.count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_date_bound, NewExpense, OwnerId};
    use rust_decimal_macros::dec;

    fn expense(category: ExpenseCategory, amount: Decimal, date: &str) -> Expense {
        let at = parse_date_bound(date).unwrap();
        Expense::from_new(
            OwnerId::new(),
            NewExpense {
                title: "item".to_string(),
                amount,
                category,
                description: None,
                expense_date: Some(at),
            },
            at,
        )
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(ExpenseCategory::Food, dec!(10.00), "2025-01-03"),
            expense(ExpenseCategory::Food, dec!(5.00), "2025-01-20"),
            expense(ExpenseCategory::Transport, dec!(15.00), "2025-02-02"),
            expense(ExpenseCategory::Rent, dec!(800.00), "2025-03-01"),
        ]
    }

    #[test]
    fn test_fold_totals() {
        let all = fold_totals(&sample(), &DateWindow::unbounded());
        assert_eq!(all, SpendTotals { total: dec!(830.00), count: 4 });

        let jan = fold_totals(&sample(), &DateWindow::month(2025, 1).unwrap());
        assert_eq!(jan, SpendTotals { total: dec!(15.00), count: 2 });

        assert_eq!(
            fold_totals(&Vec::<Expense>::new(), &DateWindow::unbounded()),
            SpendTotals::default()
        );
    }

    #[test]
    fn test_fold_by_category_matches_overall_total() {
        let expenses = sample();
        let window = DateWindow::unbounded();
        let groups = fold_by_category(&expenses, &window);

        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0],
            CategoryTotal { category: ExpenseCategory::Food, total: dec!(15.00), count: 2 }
        );

        let sum: Decimal = groups.iter().map(|g| g.total).sum();
        assert_eq!(sum, fold_totals(&expenses, &window).total);
    }

    #[test]
    fn test_fold_by_period_is_ascending() {
        let months = fold_by_period(&sample(), PeriodType::Month);
        let buckets: Vec<String> =
            months.iter().map(|p| PeriodType::Month.label(p.bucket)).collect();
        assert_eq!(buckets, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(months[0].count, 2);

        let years = fold_by_period(&sample(), PeriodType::Year);
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].total, dec!(830.00));
    }
}
