#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(dec!(42.5)), "42.50");
    assert_eq!(format_amount(dec!(0.07)), "0.07");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1957.50)), "1,957.50");
    assert_eq!(format_amount(dec!(999)), "999.00");
    assert_eq!(format_amount(dec!(1000)), "1,000.00");
    assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-1234.5)), "-1,234.50");
    assert_eq!(format_amount(dec!(-0.25)), "-0.25");
}

#[test]
fn test_format_amount_rounds_to_cents() {
    assert_eq!(format_amount(dec!(10.004)), "10.00");
    assert_eq!(format_amount(dec!(10.006)), "10.01");
}

#[test]
fn test_format_amount_tiny_negative_rounds_to_zero() {
    assert_eq!(format_amount(dec!(-0.001)), "0.00");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Rent", 10), "Rent");
    assert_eq!(truncate("Rent", 4), "Rent");
}

#[test]
fn test_truncate_cuts() {
    assert_eq!(truncate("Groceries", 5), "Groc…");
    assert_eq!(truncate("Groceries", 1), "…");
}

#[test]
fn test_truncate_zero() {
    assert_eq!(truncate("Groceries", 0), "");
    assert_eq!(truncate("", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café crème", 5), "café…");
}
