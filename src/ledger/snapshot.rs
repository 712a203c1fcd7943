use rust_decimal::Decimal;

use super::Ledger;
use crate::db::StoreResult;
use crate::models::{Expense, Income};

/// Everything shown for one month, read in a single pass.
///
/// Snapshots are never patched after a mutation; callers load a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSnapshot {
    pub month: String,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
}

impl MonthSnapshot {
    /// Income minus expenses.
    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expenses
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.incomes.is_empty()
    }
}

pub fn load_month<L: Ledger + ?Sized>(ledger: &L, month: &str) -> StoreResult<MonthSnapshot> {
    Ok(MonthSnapshot {
        month: month.to_string(),
        expenses: ledger.get_expenses(month)?,
        incomes: ledger.get_incomes(month)?,
        total_expenses: ledger.get_total_expenses(month)?,
        total_income: ledger.get_total_income(month)?,
    })
}
