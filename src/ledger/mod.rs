//! Service façade between callers and [`Storage`].
//!
//! Every operation forwards to the store unchanged. Business rules that
//! need to run before persistence belong in [`BudgetLedger`], not in the
//! store.

mod snapshot;
mod worker;

use rust_decimal::Decimal;

use crate::db::{Storage, StoreResult};
use crate::models::{Expense, Income};

pub use snapshot::{load_month, MonthSnapshot};
pub use worker::{Effect, LedgerWorker, Pending, Update};

pub trait Ledger {
    fn add_expense(&self, expense: &Expense) -> StoreResult<i64>;
    fn add_income(&self, income: &Income) -> StoreResult<i64>;

    fn get_expenses(&self, month: &str) -> StoreResult<Vec<Expense>>;
    fn get_incomes(&self, month: &str) -> StoreResult<Vec<Income>>;
    fn get_total_expenses(&self, month: &str) -> StoreResult<Decimal>;
    fn get_total_income(&self, month: &str) -> StoreResult<Decimal>;
    fn get_expense_by_id(&self, id: i64) -> StoreResult<Option<Expense>>;
    fn get_income_by_id(&self, id: i64) -> StoreResult<Option<Income>>;

    fn update_expense(&self, expense: &Expense) -> StoreResult<usize>;
    fn update_income(&self, income: &Income) -> StoreResult<usize>;
    fn remove_expense(&self, id: i64) -> StoreResult<usize>;
    fn remove_income(&self, id: i64) -> StoreResult<usize>;
}

pub struct BudgetLedger<S> {
    store: S,
}

impl<S: Storage> BudgetLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: Storage> Ledger for BudgetLedger<S> {
    fn add_expense(&self, expense: &Expense) -> StoreResult<i64> {
        self.store.insert_expense(expense)
    }

    fn add_income(&self, income: &Income) -> StoreResult<i64> {
        self.store.insert_income(income)
    }

    fn get_expenses(&self, month: &str) -> StoreResult<Vec<Expense>> {
        self.store.get_expenses_for_month(month)
    }

    fn get_incomes(&self, month: &str) -> StoreResult<Vec<Income>> {
        self.store.get_incomes_for_month(month)
    }

    fn get_total_expenses(&self, month: &str) -> StoreResult<Decimal> {
        self.store.get_monthly_total(month)
    }

    fn get_total_income(&self, month: &str) -> StoreResult<Decimal> {
        self.store.get_monthly_income(month)
    }

    fn get_expense_by_id(&self, id: i64) -> StoreResult<Option<Expense>> {
        self.store.get_expense_by_id(id)
    }

    fn get_income_by_id(&self, id: i64) -> StoreResult<Option<Income>> {
        self.store.get_income_by_id(id)
    }

    fn update_expense(&self, expense: &Expense) -> StoreResult<usize> {
        self.store.update_expense(expense)
    }

    fn update_income(&self, income: &Income) -> StoreResult<usize> {
        self.store.update_income(income)
    }

    fn remove_expense(&self, id: i64) -> StoreResult<usize> {
        self.store.delete_expense(id)
    }

    fn remove_income(&self, id: i64) -> StoreResult<usize> {
        self.store.delete_income(id)
    }
}
