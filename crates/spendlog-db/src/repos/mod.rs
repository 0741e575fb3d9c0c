//! Repository implementations

mod expense;

pub use expense::ExpenseRepo;
