//! Expense service
//!
//! Validates inputs, calls the store's owner-scoped queries and hands the
//! grouped rows to the engine. All validation runs before the store is
//! touched.

use tracing::{debug, info};

use spendlog_db::ExpenseStore;
use spendlog_types::{DateWindow, Expense, ExpenseId, ExpensePatch, NewExpense, OwnerId};

use crate::engine;
use crate::query::{total_pages, ChartQuery, ListQuery};
use crate::reports::{
    CategoryChart, CategoryList, CategorySpending, ChartVisualization, ExpenseList,
    MonthlyStatistics, SpendingSummary,
};
use crate::{ServiceError, ServiceResult};

/// Expense CRUD and analytics over an [`ExpenseStore`]
pub struct ExpenseService<S> {
    store: S,
}

impl<S: ExpenseStore> ExpenseService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn categories(&self) -> CategoryList {
        CategoryList::all()
    }

    // ========================================================================
    // Records
    // ========================================================================

    pub async fn create(&self, owner: OwnerId, new: NewExpense) -> ServiceResult<Expense> {
        new.validate()?;
        let expense = self.store.insert(owner, new).await?;
        info!(
            owner = %owner,
            expense_id = %expense.id,
            amount = %expense.amount,
            "Created expense"
        );
        Ok(expense)
    }

    pub async fn get(&self, owner: OwnerId, id: ExpenseId) -> ServiceResult<Expense> {
        self.store
            .find(owner, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {}", id)))
    }

    pub async fn update(
        &self,
        owner: OwnerId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> ServiceResult<Expense> {
        patch.validate()?;
        let expense = self.store.update(owner, id, patch).await?;
        Ok(expense)
    }

    pub async fn delete(&self, owner: OwnerId, id: ExpenseId) -> ServiceResult<()> {
        self.store.delete(owner, id).await?;
        Ok(())
    }

    pub async fn list(&self, owner: OwnerId, query: &ListQuery) -> ServiceResult<ExpenseList> {
        let filter = query.validate()?;
        let (expenses, total) = self
            .store
            .list(owner, &filter, query.offset(), query.page_size)
            .await?;

        Ok(ExpenseList {
            expenses,
            total,
            page: query.page,
            page_size: query.page_size,
            total_pages: total_pages(total, query.page_size),
        })
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    pub async fn category_spending(
        &self,
        owner: OwnerId,
        window: DateWindow,
    ) -> ServiceResult<Vec<CategorySpending>> {
        let window = DateWindow::new(window.start, window.end)?;
        let rows = self.store.totals_by_category(owner, &window).await?;
        Ok(engine::category_spending(rows))
    }

    pub async fn summary(
        &self,
        owner: OwnerId,
        window: DateWindow,
    ) -> ServiceResult<SpendingSummary> {
        let window = DateWindow::new(window.start, window.end)?;
        let totals = self.store.totals(owner, &window).await?;
        let rows = self.store.totals_by_category(owner, &window).await?;
        debug!(
            owner = %owner,
            total = %totals.total,
            count = totals.count,
            "Computed spending summary"
        );
        Ok(engine::summarize(totals, rows, &window))
    }

    pub async fn monthly_statistics(
        &self,
        owner: OwnerId,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthlyStatistics> {
        let window = DateWindow::month(year, month)?;
        let totals = self.store.totals(owner, &window).await?;
        let rows = self.store.totals_by_category(owner, &window).await?;
        Ok(engine::monthly_statistics(year, month, totals, rows))
    }

    pub async fn time_series(
        &self,
        owner: OwnerId,
        query: ChartQuery,
    ) -> ServiceResult<ChartVisualization> {
        query.validate()?;
        let buckets = self
            .store
            .totals_by_period(owner, query.period_type, query.limit)
            .await?;
        debug!(
            owner = %owner,
            period = %query.period_type,
            buckets = buckets.len(),
            "Fetched period buckets"
        );
        Ok(engine::chart_visualization(query.period_type, buckets, query.limit as usize))
    }

    pub async fn category_chart(
        &self,
        owner: OwnerId,
        window: DateWindow,
    ) -> ServiceResult<CategoryChart> {
        let window = DateWindow::new(window.start, window.end)?;
        let rows = self.store.totals_by_category(owner, &window).await?;
        Ok(engine::category_chart(rows))
    }
}
