mod expense;
mod income;

pub use expense::{Expense, DEFAULT_EXPENSE_TITLE};
pub use income::Income;
