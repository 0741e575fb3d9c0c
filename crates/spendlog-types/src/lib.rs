//! Spendlog Types - Domain types for personal expense tracking
//!
//! This crate has no dependencies on other spendlog crates. It defines:
//!
//! - Identity types (`ExpenseId`, `OwnerId`)
//! - The `Expense` record, its closed `ExpenseCategory` enumeration and the
//!   validated write payloads (`NewExpense`, `ExpensePatch`)
//! - Inclusive date windows used to scope aggregate queries
//! - Period bucketing (`PeriodType`) for time-series charts
//! - Grouped aggregate rows and the folds that produce them from records
//!
//! # Money
//!
//! All amounts are `rust_decimal::Decimal`. Nothing in this crate rounds;
//! rounding to two decimal places happens when reports are built.

pub mod identity;
pub mod expense;
pub mod window;
pub mod period;
pub mod aggregate;
pub mod error;

pub use identity::*;
pub use expense::*;
pub use window::*;
pub use period::*;
pub use aggregate::*;
pub use error::*;
