#![allow(clippy::unwrap_used)]

use budgetdb::ledger::Effect;
use budgetdb::validate::{expense_input, income_input};
use budgetdb::{
    load_month, BudgetLedger, Ledger, LedgerWorker, MigrationStrategy, Store, StoreConfig,
    StoreError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn open_ledger(dir: &TempDir) -> BudgetLedger<Store> {
    let config = StoreConfig::new(dir.path().join("budget.db"));
    BudgetLedger::new(Store::open(&config).unwrap())
}

#[test]
fn test_month_flow_on_disk() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(&dir);

    let groceries = expense_input("Groceries", "42.50", "Food", "2024-01-15").unwrap();
    let id = ledger.add_expense(&groceries).unwrap();
    ledger
        .add_income(&income_input("2024-01", "2000.00").unwrap())
        .unwrap();

    let jan = load_month(&ledger, "2024-01").unwrap();
    assert_eq!(jan.expenses, vec![groceries.with_id(id)]);
    assert_eq!(jan.balance(), dec!(1957.50));

    let feb = load_month(&ledger, "2024-02").unwrap();
    assert!(feb.is_empty());
    assert_eq!(feb.total_expenses, Decimal::ZERO);
}

#[test]
fn test_rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let ledger = open_ledger(&dir);
        ledger
            .add_expense(&expense_input("Rent", "900", "Housing", "2024-03-01").unwrap())
            .unwrap();
    }
    let ledger = open_ledger(&dir);
    assert_eq!(ledger.get_total_expenses("2024-03").unwrap(), dec!(900));
}

#[test]
fn test_schema_bump_strategies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budget.db");
    {
        let ledger = BudgetLedger::new(Store::open(&StoreConfig::new(path.clone())).unwrap());
        ledger
            .add_income(&income_input("2024-01", "10").unwrap())
            .unwrap();
    }

    let mut preserve = StoreConfig::new(path.clone());
    preserve.schema_version = 2;
    preserve.migration = MigrationStrategy::PreserveWithAlter;
    let ledger = BudgetLedger::new(Store::open(&preserve).unwrap());
    assert_eq!(ledger.get_total_income("2024-01").unwrap(), dec!(10));
    drop(ledger);

    let mut recreate = StoreConfig::new(path.clone());
    recreate.schema_version = 3;
    let ledger = BudgetLedger::new(Store::open(&recreate).unwrap());
    assert_eq!(ledger.get_total_income("2024-01").unwrap(), Decimal::ZERO);
    drop(ledger);

    // Going back to an older version is refused
    let older = StoreConfig::new(path);
    assert!(matches!(
        Store::open(&older),
        Err(StoreError::SchemaTooNew { found: 3, .. })
    ));
}

#[test]
fn test_worker_over_disk_store() {
    let dir = TempDir::new().unwrap();
    let worker = LedgerWorker::spawn(open_ledger(&dir)).unwrap();

    let added = worker
        .add_expense(
            expense_input("Coffee", "3.40", "Food", "2024-05-02").unwrap(),
            "2024-05",
        )
        .wait()
        .unwrap();
    let Effect::Inserted(id) = added.effect else {
        panic!("expected insert, got {:?}", added.effect);
    };
    assert_eq!(added.snapshot.unwrap().total_expenses, dec!(3.40));

    let removed = worker.remove_expense(id, "2024-05").wait().unwrap();
    assert_eq!(removed.effect, Effect::Affected(1));
    assert!(removed.snapshot.unwrap().expenses.is_empty());

    drop(worker);
    // The worker released the connection; the file opens again.
    assert_eq!(
        open_ledger(&dir).get_total_expenses("2024-05").unwrap(),
        Decimal::ZERO
    );
}
