//! Spendlog Database Layer
//!
//! Owner-scoped persistence for expense records.
//!
//! # Architecture
//!
//! - **`ExpenseStore`**: the storage contract. Record CRUD plus grouped
//!   sum/count queries (overall, by category, by period bucket).
//! - **`ExpenseRepo`**: PostgreSQL implementation. Grouping runs in SQL.
//! - **`InMemoryExpenseStore`**: process-local implementation with identical
//!   semantics, for tests and throwaway sessions.
//!
//! Sums come back unrounded; rounding is a reporting concern.

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod repos;
pub mod store;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use memory::InMemoryExpenseStore;
pub use repos::*;
pub use store::{ExpenseFilter, ExpenseStore};

/// PostgreSQL connection pool
#[derive(Clone)]
pub struct Database {
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to PostgreSQL: {}", config.postgres_url_masked());

        let pg = PgPoolOptions::new()
            .max_connections(config.pg_max_connections)
            .min_connections(config.pg_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.pg_acquire_timeout_secs))
            .connect(&config.postgres_url)
            .await
            .map_err(|e| DbError::Connection(format!("PostgreSQL: {}", e)))?;

        info!("Connected to PostgreSQL");
        Ok(Self { pg })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pg)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Round-trip a trivial query
    pub async fn health_check(&self) -> HealthStatus {
        let postgres = sqlx::query("SELECT 1").fetch_one(&self.pg).await.is_ok();
        HealthStatus { postgres, healthy: postgres }
    }

    pub fn expense_repo(&self) -> ExpenseRepo {
        ExpenseRepo::new(self.pg.clone())
    }
}

/// Database health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub postgres: bool,
    pub healthy: bool,
}
