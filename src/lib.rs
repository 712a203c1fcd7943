pub mod cli;
pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod util;
pub mod validate;

#[cfg(test)]
#[path = "util_tests.rs"]
mod util_tests;

pub use config::{MigrationStrategy, StoreConfig};
pub use db::{Storage, Store, StoreError, StoreResult};
pub use ledger::{load_month, BudgetLedger, Ledger, LedgerWorker, MonthSnapshot};
pub use models::{Expense, Income};
