//! The expense store contract
//!
//! Every method takes the owner explicitly. There is no way to read, change or
//! aggregate expenses without naming whose expenses they are, and a record
//! owned by someone else behaves exactly like a missing one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use spendlog_types::{
    CategoryTotal, DateWindow, Expense, ExpenseCategory, ExpenseId, ExpensePatch, NewExpense,
    OwnerId, PeriodTotal, PeriodType, SpendTotals,
};

use crate::DbResult;

/// Filters for listing expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    pub window: DateWindow,
    /// Case-insensitive substring matched against title or description
    pub search: Option<String>,
}

impl ExpenseFilter {
    /// In-process equivalent of the SQL predicate
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }
        if !self.window.contains(expense.expense_date) {
            return false;
        }
        match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                expense.title.to_lowercase().contains(&needle)
                    || expense
                        .description
                        .as_deref()
                        .map_or(false, |d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Owner-scoped expense storage.
///
/// Grouped queries return unrounded sums. Ordering of category rows is not
/// part of the contract.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persist a new expense for `owner`
    async fn insert(&self, owner: OwnerId, new: NewExpense) -> DbResult<Expense>;

    /// Look up one expense; `None` if missing or owned by someone else
    async fn find(&self, owner: OwnerId, id: ExpenseId) -> DbResult<Option<Expense>>;

    /// One page of matching expenses, newest `expense_date` first, plus the
    /// total number of matches
    async fn list(
        &self,
        owner: OwnerId,
        filter: &ExpenseFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<Expense>, i64)>;

    /// Apply a partial update; `DbError::NotFound` if missing or foreign
    async fn update(&self, owner: OwnerId, id: ExpenseId, patch: ExpensePatch) -> DbResult<Expense>;

    /// Hard delete; `DbError::NotFound` if missing or foreign
    async fn delete(&self, owner: OwnerId, id: ExpenseId) -> DbResult<()>;

    /// Overall sum and count inside `window`
    async fn totals(&self, owner: OwnerId, window: &DateWindow) -> DbResult<SpendTotals>;

    /// Sum and count per category inside `window`
    async fn totals_by_category(
        &self,
        owner: OwnerId,
        window: &DateWindow,
    ) -> DbResult<Vec<CategoryTotal>>;

    /// The `limit` most recent non-empty buckets, most recent first
    async fn totals_by_period(
        &self,
        owner: OwnerId,
        period: PeriodType,
        limit: i64,
    ) -> DbResult<Vec<PeriodTotal>>;
}
