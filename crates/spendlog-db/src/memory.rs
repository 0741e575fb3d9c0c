//! In-memory expense store
//!
//! Same contract as the PostgreSQL repository, backed by a map behind a tokio
//! `RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use spendlog_types::{
    fold_by_category, fold_by_period, fold_totals, CategoryTotal, DateWindow, Expense, ExpenseId,
    ExpensePatch, NewExpense, OwnerId, PeriodTotal, PeriodType, SpendTotals,
};

use crate::{DbError, DbResult, ExpenseFilter, ExpenseStore};

/// Expense store held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    expenses: RwLock<HashMap<ExpenseId, Expense>>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, keeping their ids and owners
    pub fn with_expenses(expenses: impl IntoIterator<Item = Expense>) -> Self {
        Self {
            expenses: RwLock::new(expenses.into_iter().map(|e| (e.id, e)).collect()),
        }
    }

    async fn owned_by(&self, owner: OwnerId) -> Vec<Expense> {
        self.expenses
            .read()
            .await
            .values()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn insert(&self, owner: OwnerId, new: NewExpense) -> DbResult<Expense> {
        let expense = Expense::from_new(owner, new, Utc::now());
        self.expenses.write().await.insert(expense.id, expense.clone());
        info!(owner = %owner, expense_id = %expense.id, "Expense recorded");
        Ok(expense)
    }

    async fn find(&self, owner: OwnerId, id: ExpenseId) -> DbResult<Option<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(&id).filter(|e| e.owner == owner).cloned())
    }

    async fn list(
        &self,
        owner: OwnerId,
        filter: &ExpenseFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<Expense>, i64)> {
        let mut matching: Vec<Expense> = self
            .owned_by(owner)
            .await
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();

        matching.sort_by(|a, b| {
            b.expense_date
                .cmp(&a.expense_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect::<Vec<_>>();

        debug!(owner = %owner, total, returned = page.len(), "Listed expenses");
        Ok((page, total))
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> DbResult<Expense> {
        let mut expenses = self.expenses.write().await;
        match expenses.get_mut(&id).filter(|e| e.owner == owner) {
            Some(expense) => {
                expense.apply(patch, Utc::now());
                info!(owner = %owner, expense_id = %id, "Expense updated");
                Ok(expense.clone())
            }
            None => {
                warn!(owner = %owner, expense_id = %id, "Update of unknown expense");
                Err(DbError::NotFound(format!("Expense {}", id)))
            }
        }
    }

    async fn delete(&self, owner: OwnerId, id: ExpenseId) -> DbResult<()> {
        let mut expenses = self.expenses.write().await;
        if !expenses.get(&id).map_or(false, |e| e.owner == owner) {
            warn!(owner = %owner, expense_id = %id, "Delete of unknown expense");
            return Err(DbError::NotFound(format!("Expense {}", id)));
        }
        expenses.remove(&id);
        info!(owner = %owner, expense_id = %id, "Expense deleted");
        Ok(())
    }

    async fn totals(&self, owner: OwnerId, window: &DateWindow) -> DbResult<SpendTotals> {
        Ok(fold_totals(&self.owned_by(owner).await, window))
    }

    async fn totals_by_category(
        &self,
        owner: OwnerId,
        window: &DateWindow,
    ) -> DbResult<Vec<CategoryTotal>> {
        Ok(fold_by_category(&self.owned_by(owner).await, window))
    }

    async fn totals_by_period(
        &self,
        owner: OwnerId,
        period: PeriodType,
        limit: i64,
    ) -> DbResult<Vec<PeriodTotal>> {
        let buckets = fold_by_period(&self.owned_by(owner).await, period);
        Ok(buckets.into_iter().rev().take(limit.max(0) as usize).collect())
    }
}
