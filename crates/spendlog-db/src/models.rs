//! Database models - mapped from PostgreSQL rows

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use spendlog_types::{CategoryTotal, Expense, ExpenseCategory, ExpenseId, OwnerId, PeriodTotal};

use crate::{DbError, DbResult};

// ============================================================================
// Expense Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbExpense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbExpense> for Expense {
    type Error = DbError;

    fn try_from(row: DbExpense) -> DbResult<Self> {
        Ok(Expense {
            id: ExpenseId::from_uuid(row.id),
            owner: OwnerId::from_uuid(row.user_id),
            title: row.title,
            amount: row.amount,
            category: parse_category(&row.category)?,
            description: row.description,
            expense_date: row.expense_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ============================================================================
// Aggregate Rows
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DbCategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: i64,
}

impl TryFrom<DbCategoryTotal> for CategoryTotal {
    type Error = DbError;

    fn try_from(row: DbCategoryTotal) -> DbResult<Self> {
        Ok(CategoryTotal {
            category: parse_category(&row.category)?,
            total: row.total,
            count: row.count,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPeriodTotal {
    pub bucket: NaiveDate,
    pub total: Decimal,
    pub count: i64,
}

impl From<DbPeriodTotal> for PeriodTotal {
    fn from(row: DbPeriodTotal) -> Self {
        PeriodTotal { bucket: row.bucket, total: row.total, count: row.count }
    }
}

fn parse_category(raw: &str) -> DbResult<ExpenseCategory> {
    raw.parse::<ExpenseCategory>()
        .map_err(|e| DbError::Corrupt(e.to_string()))
}
