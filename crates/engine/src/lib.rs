//! Expense tracking engine.
//!
//! Holds the account and expense domain, the category rules, query scoping
//! and aggregation. Storage is reached through the [`Store`] trait.

pub use categories::Category;
pub use commands::{CreateExpenseCmd, UpdateExpenseCmd};
pub use error::EngineError;
pub use expenses::{Expense, NewExpense};
pub use ops::{Engine, EngineBuilder, UPGRADE_REQUIRED};
pub use scope::{ExpenseFilter, FilterSelector, QueryScope, TimeWindow};
pub use stats::{CategoryTotal, aggregate};
pub use store::{DbStore, Store};
pub use users::{Account, NewAccount};

mod categories;
mod commands;
mod error;
mod expenses;
mod ops;
mod password;
mod scope;
mod stats;
mod store;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
