mod error;
mod schema;

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::{MigrationStrategy, StoreConfig};
use crate::models::*;

pub use error::{StoreError, StoreResult};
pub use schema::CURRENT_VERSION;

const EXPENSE_COLUMNS: &str = "id, title, amount, category, date";
const INCOME_COLUMNS: &str = "id, month, amount";

/// Raw persistence operations over the `expenses` and `incomes` tables.
///
/// Mutations report how many rows they touched; a missing id is `Ok(0)`,
/// never an error. Month-scoped reads return empty results when nothing
/// matches.
pub trait Storage {
    fn insert_expense(&self, expense: &Expense) -> StoreResult<i64>;
    fn insert_income(&self, income: &Income) -> StoreResult<i64>;

    /// Expenses whose `date` begins with `"<month>-"`, newest first.
    fn get_expenses_for_month(&self, month: &str) -> StoreResult<Vec<Expense>>;
    /// Incomes whose `month` equals `month` exactly, in id order.
    fn get_incomes_for_month(&self, month: &str) -> StoreResult<Vec<Income>>;
    fn get_monthly_total(&self, month: &str) -> StoreResult<Decimal>;
    fn get_monthly_income(&self, month: &str) -> StoreResult<Decimal>;
    fn get_expense_by_id(&self, id: i64) -> StoreResult<Option<Expense>>;
    fn get_income_by_id(&self, id: i64) -> StoreResult<Option<Income>>;

    fn update_expense(&self, expense: &Expense) -> StoreResult<usize>;
    fn update_income(&self, income: &Income) -> StoreResult<usize>;
    fn delete_expense(&self, id: i64) -> StoreResult<usize>;
    fn delete_income(&self, id: i64) -> StoreResult<usize>;
}

/// SQLite-backed [`Storage`].
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let unavailable = |source: rusqlite::Error| StoreError::Unavailable {
            path: config.path.clone(),
            source,
        };
        let conn = Connection::open(&config.path).map_err(unavailable)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(unavailable)?;
        let mut store = Self { conn };
        store.migrate(config.schema_version, config.migration)?;
        debug!(path = %config.path.display(), "store opened");
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate(schema::CURRENT_VERSION, MigrationStrategy::default())?;
        Ok(store)
    }

    fn migrate(&mut self, target: i32, strategy: MigrationStrategy) -> StoreResult<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![target],
            )?;
            tx.commit()?;
            info!(version = target, "created budget schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        if current == target {
            return Ok(());
        }
        if current > target {
            return Err(StoreError::SchemaTooNew {
                found: current,
                supported: target,
            });
        }

        let tx = self.conn.transaction()?;
        match strategy {
            MigrationStrategy::DropRecreate => {
                info!(from = current, to = target, "schema version changed, dropping all budget data");
                tx.execute_batch(schema::DROP_ALL)?;
                tx.execute_batch(schema::SCHEMA)?;
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![target],
                )?;
            }
            MigrationStrategy::PreserveWithAlter => {
                for &(from_version, sql) in schema::MIGRATIONS {
                    if from_version >= current && from_version < target {
                        info!(from = from_version, "applying schema migration");
                        tx.execute_batch(sql)?;
                    }
                }
                tx.execute("DELETE FROM schema_version", [])?;
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![target],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl Storage for Store {
    fn insert_expense(&self, expense: &Expense) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO expenses (title, amount, category, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.category,
                expense.date,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, date = %expense.date, "inserted expense");
        Ok(id)
    }

    fn insert_income(&self, income: &Income) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO incomes (month, amount) VALUES (?1, ?2)",
            params![income.month, income.amount.to_string()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, month = %income.month, "inserted income");
        Ok(id)
    }

    fn get_expenses_for_month(&self, month: &str) -> StoreResult<Vec<Expense>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE substr(date, 1, length(?1)) = ?1
             ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![month_prefix(month)], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_incomes_for_month(&self, month: &str) -> StoreResult<Vec<Income>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INCOME_COLUMNS} FROM incomes WHERE month = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![month], income_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_monthly_total(&self, month: &str) -> StoreResult<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM expenses WHERE substr(date, 1, length(?1)) = ?1")?;
        let amounts = stmt.query_map(params![month_prefix(month)], |row| {
            row.get::<_, String>(0)
        })?;
        sum_amounts(month, amounts)
    }

    fn get_monthly_income(&self, month: &str) -> StoreResult<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM incomes WHERE month = ?1")?;
        let amounts = stmt.query_map(params![month], |row| row.get::<_, String>(0))?;
        sum_amounts(month, amounts)
    }

    fn get_expense_by_id(&self, id: i64) -> StoreResult<Option<Expense>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
                params![id],
                expense_from_row,
            )
            .optional()?)
    }

    fn get_income_by_id(&self, id: i64) -> StoreResult<Option<Income>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {INCOME_COLUMNS} FROM incomes WHERE id = ?1"),
                params![id],
                income_from_row,
            )
            .optional()?)
    }

    fn update_expense(&self, expense: &Expense) -> StoreResult<usize> {
        let Some(id) = expense.id else {
            debug!("update_expense called without an id");
            return Ok(0);
        };
        let changed = self.conn.execute(
            "UPDATE expenses SET title = ?1, amount = ?2, category = ?3, date = ?4 WHERE id = ?5",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.category,
                expense.date,
                id,
            ],
        )?;
        debug!(id, changed, "updated expense");
        Ok(changed)
    }

    fn update_income(&self, income: &Income) -> StoreResult<usize> {
        let Some(id) = income.id else {
            debug!("update_income called without an id");
            return Ok(0);
        };
        let changed = self.conn.execute(
            "UPDATE incomes SET month = ?1, amount = ?2 WHERE id = ?3",
            params![income.month, income.amount.to_string(), id],
        )?;
        debug!(id, changed, "updated income");
        Ok(changed)
    }

    fn delete_expense(&self, id: i64) -> StoreResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        debug!(id, changed, "deleted expense");
        Ok(changed)
    }

    fn delete_income(&self, id: i64) -> StoreResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM incomes WHERE id = ?1", params![id])?;
        debug!(id, changed, "deleted income");
        Ok(changed)
    }
}

/// Prefix every date in `month` starts with. Compared with `substr`, so no
/// character in `month` is special and case is significant.
pub fn month_prefix(month: &str) -> String {
    format!("{month}-")
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount: String = row.get(2)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        amount: parse_amount(&amount),
        category: row.get(3)?,
        date: row.get(4)?,
    })
}

fn income_from_row(row: &Row<'_>) -> rusqlite::Result<Income> {
    let amount: String = row.get(2)?;
    Ok(Income {
        id: Some(row.get(0)?),
        month: row.get(1)?,
        amount: parse_amount(&amount),
    })
}

fn parse_amount(raw: &str) -> Decimal {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or_else(|_| {
            warn!(raw, "unparseable stored amount, reading as zero");
            Decimal::ZERO
        })
}

/// Exact decimal sum of stored amounts. SQLite's SUM() would go through
/// REAL, so the fold happens here.
fn sum_amounts<I>(month: &str, amounts: I) -> StoreResult<Decimal>
where
    I: Iterator<Item = rusqlite::Result<String>>,
{
    let mut total = Decimal::ZERO;
    for raw in amounts {
        total = total
            .checked_add(parse_amount(&raw?))
            .ok_or_else(|| StoreError::AmountOverflow(month.to_string()))?;
    }
    Ok(total)
}
