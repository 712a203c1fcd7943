//! Input rules applied before anything reaches the ledger.
//!
//! The store accepts whatever it is given; these checks are the only place
//! amounts, categories and date shapes are rejected.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::{Expense, Income, DEFAULT_EXPENSE_TITLE};

static DATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok());
static MONTH_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").ok());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount '{0}': must be a number greater than 0")]
    InvalidAmount(String),

    #[error("Category is required")]
    MissingCategory,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Use YYYY-MM")]
    InvalidMonth(String),
}

/// Build an expense from raw form fields. A blank title becomes "Expense".
pub fn expense_input(
    title: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Result<Expense, ValidationError> {
    let amount = positive_amount(amount)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    let date = date.trim();
    if !is_date(date) {
        return Err(ValidationError::InvalidDate(date.to_string()));
    }
    let title = match title.trim() {
        "" => DEFAULT_EXPENSE_TITLE,
        t => t,
    };
    Ok(Expense::new(
        title.to_string(),
        amount,
        category.to_string(),
        date.to_string(),
    ))
}

pub fn income_input(month: &str, amount: &str) -> Result<Income, ValidationError> {
    let amount = positive_amount(amount)?;
    let month = month_arg(month)?;
    Ok(Income::new(month, amount))
}

/// Trimmed month argument, rejected unless it looks like "YYYY-MM".
pub fn month_arg(month: &str) -> Result<String, ValidationError> {
    let month = month.trim();
    if is_month(month) {
        Ok(month.to_string())
    } else {
        Err(ValidationError::InvalidMonth(month.to_string()))
    }
}

pub fn positive_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    match Decimal::from_str(raw) {
        Ok(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

pub fn is_date(s: &str) -> bool {
    matches_shape(&DATE_RE, s)
}

pub fn is_month(s: &str) -> bool {
    matches_shape(&MONTH_RE, s)
}

/// The local calendar month as "YYYY-MM".
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// The local calendar date as "YYYY-MM-DD".
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn matches_shape(re: &Option<Regex>, s: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(s))
}
