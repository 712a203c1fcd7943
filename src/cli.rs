use anyhow::{Context, Result};

use crate::config::StoreConfig;
use crate::db::Store;
use crate::ledger::{load_month, BudgetLedger, Ledger, MonthSnapshot};
use crate::models::{Expense, Income};
use crate::util::{format_amount, truncate};
use crate::validate;

pub fn run(args: Vec<String>) -> Result<()> {
    let (db_flag, args) = take_db_flag(args)?;
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("budgetdb {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let config = StoreConfig::resolve(db_flag.as_deref())?;
    let store = Store::open(&config)
        .with_context(|| format!("Failed to open budget store: {}", config.path.display()))?;
    let ledger = BudgetLedger::new(store);
    dispatch(command, &args[1..], &ledger)
}

fn dispatch(command: &str, args: &[String], ledger: &impl Ledger) -> Result<()> {
    match command {
        "summary" | "s" => cli_summary(args, ledger),
        "expenses" => cli_expenses(args, ledger),
        "incomes" => cli_incomes(args, ledger),
        "income" => cli_income(args, ledger),
        "add-expense" => cli_add_expense(args, ledger),
        "add-income" => cli_add_income(args, ledger),
        "update-expense" => cli_update_expense(args, ledger),
        "update-income" => cli_update_income(args, ledger),
        "rm-expense" => cli_remove_expense(args, ledger),
        "rm-income" => cli_remove_income(args, ledger),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budgetdb — monthly expense and income ledger");
    println!();
    println!("Usage: budgetdb [--db <path>] <command>");
    println!();
    println!("Commands:");
    println!("  summary [YYYY-MM]               Totals, balance and rows for a month");
    println!("  expenses [YYYY-MM]              List a month's expenses, newest first");
    println!("  incomes [YYYY-MM]               List a month's incomes");
    println!("  income <id>                     Show one income");
    println!("  add-expense                     Record an expense");
    println!("    --amount <n> --category <c>   Required");
    println!("    [--date <YYYY-MM-DD>]         Default: today");
    println!("    [--title <t>]                 Default: \"Expense\"");
    println!("  add-income --amount <n>         Record an income");
    println!("    [--month <YYYY-MM>]           Default: current month");
    println!("  update-expense <id> [--title] [--amount] [--category] [--date]");
    println!("  update-income <id> [--month] [--amount]");
    println!("  rm-expense <id>                 Delete an expense");
    println!("  rm-income <id>                  Delete an income");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Environment:");
    println!("  BUDGETDB_PATH                   Database file (overridden by --db)");
    println!("  BUDGETDB_MIGRATION              drop-recreate (default) or preserve");
    println!("  RUST_LOG                        Log filter, e.g. budgetdb=debug");
}

// ── Reads ─────────────────────────────────────────────────────

fn cli_summary(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let month = month_or_current(args)?;
    let snapshot = load_month(ledger, &month)?;
    print_summary(&snapshot);
    Ok(())
}

fn cli_expenses(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let month = month_or_current(args)?;
    let expenses = ledger.get_expenses(&month)?;
    if expenses.is_empty() {
        println!("No expenses recorded for {month}");
        return Ok(());
    }
    print_expenses(&expenses);
    Ok(())
}

fn cli_incomes(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let month = month_or_current(args)?;
    let incomes = ledger.get_incomes(&month)?;
    if incomes.is_empty() {
        println!("No income recorded for {month}");
        return Ok(());
    }
    print_incomes(&incomes);
    Ok(())
}

fn cli_income(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let id = id_arg(args)?;
    match ledger.get_income_by_id(id)? {
        Some(income) => println!(
            "Income #{id} — {}  {}",
            income.month,
            format_amount(income.amount)
        ),
        None => println!("No income with id {id}"),
    }
    Ok(())
}

// ── Mutations ─────────────────────────────────────────────────

fn cli_add_expense(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let date = flag(args, "--date")
        .map(str::to_string)
        .unwrap_or_else(validate::today);
    let expense = validate::expense_input(
        flag(args, "--title").unwrap_or_default(),
        required_flag(args, "--amount")?,
        required_flag(args, "--category")?,
        &date,
    )?;
    let id = ledger.add_expense(&expense)?;
    println!("Added expense #{id}");
    reload(ledger, expense.month().unwrap_or(&date))
}

fn cli_add_income(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let month = flag(args, "--month")
        .map(str::to_string)
        .unwrap_or_else(validate::current_month);
    let income = validate::income_input(&month, required_flag(args, "--amount")?)?;
    let id = ledger.add_income(&income)?;
    println!("Added income #{id}");
    reload(ledger, &income.month)
}

fn cli_update_expense(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let id = id_arg(args)?;
    let Some(current) = ledger.get_expense_by_id(id)? else {
        println!("No expense with id {id}");
        return Ok(());
    };

    let amount = current.amount.to_string();
    let expense = validate::expense_input(
        flag(args, "--title").unwrap_or(&current.title),
        flag(args, "--amount").unwrap_or(&amount),
        flag(args, "--category").unwrap_or(&current.category),
        flag(args, "--date").unwrap_or(&current.date),
    )?
    .with_id(id);

    let changed = ledger.update_expense(&expense)?;
    println!("Updated {changed} expense(s)");
    reload(ledger, expense.month().unwrap_or(&expense.date))
}

fn cli_update_income(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let id = id_arg(args)?;
    let Some(current) = ledger.get_income_by_id(id)? else {
        println!("No income with id {id}");
        return Ok(());
    };

    let amount = current.amount.to_string();
    let income = validate::income_input(
        flag(args, "--month").unwrap_or(&current.month),
        flag(args, "--amount").unwrap_or(&amount),
    )?
    .with_id(id);

    let changed = ledger.update_income(&income)?;
    println!("Updated {changed} income(s)");
    reload(ledger, &income.month)
}

fn cli_remove_expense(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let id = id_arg(args)?;
    let month = ledger
        .get_expense_by_id(id)?
        .and_then(|e| e.month().map(str::to_string));
    let removed = ledger.remove_expense(id)?;
    if removed == 0 {
        println!("No expense with id {id}");
        return Ok(());
    }
    println!("Removed expense #{id}");
    match month {
        Some(m) => reload(ledger, &m),
        None => Ok(()),
    }
}

fn cli_remove_income(args: &[String], ledger: &impl Ledger) -> Result<()> {
    let id = id_arg(args)?;
    let month = ledger.get_income_by_id(id)?.map(|i| i.month);
    let removed = ledger.remove_income(id)?;
    if removed == 0 {
        println!("No income with id {id}");
        return Ok(());
    }
    println!("Removed income #{id}");
    match month {
        Some(m) => reload(ledger, &m),
        None => Ok(()),
    }
}

/// Re-read the whole month after a mutation and print it.
fn reload(ledger: &impl Ledger, month: &str) -> Result<()> {
    println!();
    print_summary(&load_month(ledger, month)?);
    Ok(())
}

// ── Output ────────────────────────────────────────────────────

fn print_summary(snapshot: &MonthSnapshot) {
    println!("budgetdb — {}", snapshot.month);
    println!("{}", "─".repeat(40));
    println!("  Income:     {:>14}", format_amount(snapshot.total_income));
    println!("  Expenses:   {:>14}", format_amount(snapshot.total_expenses));
    println!("  Balance:    {:>14}", format_amount(snapshot.balance()));

    if !snapshot.incomes.is_empty() {
        println!();
        print_incomes(&snapshot.incomes);
    }
    if !snapshot.expenses.is_empty() {
        println!();
        print_expenses(&snapshot.expenses);
    }
}

fn print_expenses(expenses: &[Expense]) {
    println!(
        "{:<5} {:<10} {:<16} {:<24} {:>12}",
        "ID", "Date", "Category", "Title", "Amount"
    );
    println!("{}", "─".repeat(71));
    for e in expenses {
        println!(
            "{:<5} {:<10} {:<16} {:<24} {:>12}",
            e.id.unwrap_or(0),
            e.date,
            truncate(&e.category, 16),
            truncate(&e.title, 24),
            format_amount(e.amount),
        );
    }
}

fn print_incomes(incomes: &[Income]) {
    println!("{:<5} {:<10} {:>12}", "ID", "Month", "Amount");
    println!("{}", "─".repeat(29));
    for i in incomes {
        println!(
            "{:<5} {:<10} {:>12}",
            i.id.unwrap_or(0),
            i.month,
            format_amount(i.amount),
        );
    }
}

// ── Argument helpers ──────────────────────────────────────────

/// Pull `--db <path>` out of the argument list wherever it appears.
fn take_db_flag(args: Vec<String>) -> Result<(Option<String>, Vec<String>)> {
    let Some(pos) = args.iter().position(|a| a == "--db") else {
        return Ok((None, args));
    };
    let path = args
        .get(pos + 1)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("--db requires a path"))?;
    let rest = args
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != pos && *i != pos + 1)
        .map(|(_, a)| a)
        .collect();
    Ok((Some(path), rest))
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn required_flag<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    flag(args, name).ok_or_else(|| anyhow::anyhow!("Missing required {name} <value>"))
}

fn id_arg(args: &[String]) -> Result<i64> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Missing <id> argument"))?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid id: {raw}"))
}

fn month_or_current(args: &[String]) -> Result<String> {
    match args.first().filter(|a| !a.starts_with('-')) {
        Some(m) => Ok(validate::month_arg(m)?),
        None => Ok(validate::current_month()),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
