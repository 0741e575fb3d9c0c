//! Expense repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use spendlog_types::{
    CategoryTotal, DateWindow, Expense, ExpenseId, ExpensePatch, NewExpense, OwnerId, PeriodTotal,
    PeriodType, SpendTotals,
};

use crate::models::{DbCategoryTotal, DbExpense, DbPeriodTotal};
use crate::{DbError, DbResult, ExpenseFilter, ExpenseStore};

const EXPENSE_COLUMNS: &str =
    "id, user_id, title, amount, category, description, expense_date, created_at, updated_at";

/// PostgreSQL-backed expense storage
#[derive(Clone)]
pub struct ExpenseRepo {
    pool: PgPool,
}

impl ExpenseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an ILIKE pattern that matches `search` literally anywhere.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ExpenseStore for ExpenseRepo {
    async fn insert(&self, owner: OwnerId, new: NewExpense) -> DbResult<Expense> {
        let expense = Expense::from_new(owner, new, Utc::now());

        let row = sqlx::query_as::<_, DbExpense>(&format!(
            r#"
            INSERT INTO expenses (
                id, user_id, title, amount, category, description,
                expense_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(expense.id.as_uuid())
        .bind(owner.as_uuid())
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(expense.category.as_str())
        .bind(&expense.description)
        .bind(expense.expense_date)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .fetch_one(&self.pool)
        .await?;

        info!(owner = %owner, expense_id = %expense.id, "Expense recorded");
        Expense::try_from(row)
    }

    async fn find(&self, owner: OwnerId, id: ExpenseId) -> DbResult<Option<Expense>> {
        let row = sqlx::query_as::<_, DbExpense>(&format!(
            "SELECT {} FROM expenses WHERE id = $1 AND user_id = $2",
            EXPENSE_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Expense::try_from).transpose()
    }

    async fn list(
        &self,
        owner: OwnerId,
        filter: &ExpenseFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<Expense>, i64)> {
        const PREDICATE: &str = r#"
            user_id = $1
            AND ($2::text IS NULL OR category = $2)
            AND ($3::timestamptz IS NULL OR expense_date >= $3)
            AND ($4::timestamptz IS NULL OR expense_date <= $4)
            AND ($5::text IS NULL OR title ILIKE $5 OR description ILIKE $5)
        "#;

        let category = filter.category.map(|c| c.as_str());
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM expenses WHERE {}", PREDICATE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner.as_uuid())
            .bind(category)
            .bind(filter.window.start)
            .bind(filter.window.end)
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, DbExpense>(&format!(
            r#"
            SELECT {} FROM expenses
            WHERE {}
            ORDER BY expense_date DESC, created_at DESC, id DESC
            LIMIT $6 OFFSET $7
            "#,
            EXPENSE_COLUMNS, PREDICATE
        ))
        .bind(owner.as_uuid())
        .bind(category)
        .bind(filter.window.start)
        .bind(filter.window.end)
        .bind(search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let expenses = rows
            .into_iter()
            .map(Expense::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(owner = %owner, total, returned = expenses.len(), "Listed expenses");
        Ok((expenses, total))
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> DbResult<Expense> {
        let row = sqlx::query_as::<_, DbExpense>(&format!(
            r#"
            UPDATE expenses SET
                title = COALESCE($3, title),
                amount = COALESCE($4, amount),
                category = COALESCE($5, category),
                description = CASE WHEN $6 THEN $7 ELSE description END,
                expense_date = COALESCE($8, expense_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .bind(patch.title.as_deref())
        .bind(patch.amount)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.expense_date)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                info!(owner = %owner, expense_id = %id, "Expense updated");
                Expense::try_from(row)
            }
            None => {
                warn!(owner = %owner, expense_id = %id, "Update of unknown expense");
                Err(DbError::NotFound(format!("Expense {}", id)))
            }
        }
    }

    async fn delete(&self, owner: OwnerId, id: ExpenseId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(owner = %owner, expense_id = %id, "Delete of unknown expense");
            return Err(DbError::NotFound(format!("Expense {}", id)));
        }

        info!(owner = %owner, expense_id = %id, "Expense deleted");
        Ok(())
    }

    async fn totals(&self, owner: OwnerId, window: &DateWindow) -> DbResult<SpendTotals> {
        let (total, count) = sqlx::query_as::<_, (rust_decimal::Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
            FROM expenses
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR expense_date >= $2)
              AND ($3::timestamptz IS NULL OR expense_date <= $3)
            "#,
        )
        .bind(owner.as_uuid())
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(SpendTotals { total, count })
    }

    async fn totals_by_category(
        &self,
        owner: OwnerId,
        window: &DateWindow,
    ) -> DbResult<Vec<CategoryTotal>> {
        let rows = sqlx::query_as::<_, DbCategoryTotal>(
            r#"
            SELECT category, SUM(amount) AS total, COUNT(*) AS count
            FROM expenses
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR expense_date >= $2)
              AND ($3::timestamptz IS NULL OR expense_date <= $3)
            GROUP BY category
            "#,
        )
        .bind(owner.as_uuid())
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner = %owner, groups = rows.len(), "Grouped expenses by category");
        rows.into_iter().map(CategoryTotal::try_from).collect()
    }

    async fn totals_by_period(
        &self,
        owner: OwnerId,
        period: PeriodType,
        limit: i64,
    ) -> DbResult<Vec<PeriodTotal>> {
        // date_trunc('week', ..) lands on the ISO Monday, same as PeriodType::truncate
        let rows = sqlx::query_as::<_, DbPeriodTotal>(
            r#"
            SELECT date_trunc($2, expense_date AT TIME ZONE 'UTC')::date AS bucket,
                   SUM(amount) AS total,
                   COUNT(*) AS count
            FROM expenses
            WHERE user_id = $1
            GROUP BY bucket
            ORDER BY bucket DESC
            LIMIT $3
            "#,
        )
        .bind(owner.as_uuid())
        .bind(period.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            owner = %owner,
            period = %period,
            buckets = rows.len(),
            "Grouped expenses by period"
        );
        Ok(rows.into_iter().map(PeriodTotal::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spendlog_types::ExpenseCategory;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cafe"), "%cafe%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    async fn repo() -> ExpenseRepo {
        let config = crate::DatabaseConfig::default();
        let db = crate::Database::connect(&config).await.unwrap();
        db.migrate().await.unwrap();
        db.expense_repo()
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_roundtrip_and_scoping() {
        let repo = repo().await;
        let owner = OwnerId::new();
        let stranger = OwnerId::new();

        let expense = repo
            .insert(
                owner,
                NewExpense {
                    title: "Train ticket".to_string(),
                    amount: dec!(23.40),
                    category: ExpenseCategory::Transport,
                    description: Some("Window seat".to_string()),
                    expense_date: None,
                },
            )
            .await
            .unwrap();

        assert!(repo.find(owner, expense.id).await.unwrap().is_some());

        let retitled = repo
            .update(
                owner,
                expense.id,
                ExpensePatch { title: Some("Night train".to_string()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(retitled.description.as_deref(), Some("Window seat"));

        let cleared = repo
            .update(
                owner,
                expense.id,
                ExpensePatch { description: Some(None), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.title, "Night train");
        assert!(repo.find(stranger, expense.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(stranger, expense.id).await, Err(DbError::NotFound(_))));

        let totals = repo.totals(owner, &DateWindow::unbounded()).await.unwrap();
        assert_eq!(totals, SpendTotals { total: dec!(23.40), count: 1 });

        let weeks = repo.totals_by_period(owner, PeriodType::Week, 12).await.unwrap();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].bucket, PeriodType::Week.bucket_start(expense.expense_date));

        repo.delete(owner, expense.id).await.unwrap();
        assert!(repo.find(owner, expense.id).await.unwrap().is_none());
    }
}
