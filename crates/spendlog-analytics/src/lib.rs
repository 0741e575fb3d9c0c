//! Spendlog Analytics
//!
//! Turns a user's expense records into grouped, time-bucketed and
//! percentage-normalised reports.
//!
//! - [`engine`]: pure aggregation over grouped rows or raw records
//! - [`reports`]: the response-ready report types
//! - [`query`]: listing and chart parameters with their bounds
//! - [`service`]: [`ExpenseService`], the validated facade over an
//!   [`ExpenseStore`](spendlog_db::ExpenseStore)
//!
//! # Usage
//!
//! ```ignore
//! let service = ExpenseService::new(InMemoryExpenseStore::new());
//! let stats = service.monthly_statistics(owner, 2025, 1).await?;
//! println!("{} spent in {}", stats.total_spending, stats.period);
//! ```

pub mod engine;
pub mod error;
pub mod query;
pub mod reports;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use query::{ChartQuery, ListQuery};
pub use reports::*;
pub use service::ExpenseService;
