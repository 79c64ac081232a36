//! Money helpers
//!
//! WooCommerce sends every amount as a decimal string (`"12.50"`). Amounts
//! are parsed into [`Decimal`] once and formatted with two decimals on the
//! way out.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a money string, tolerating currency symbols and surrounding spaces.
///
/// Malformed input parses to zero.
pub fn parse_amount(raw: &str) -> Decimal {
    parse_amount_opt(raw).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_amount`] but distinguishes "missing/garbage" from zero
pub fn parse_amount_opt(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '¥' | '￥' | '€' | '£' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// `"0"`, `"0.0"`, `"0.00"` (and anything else that parses to zero)
pub fn is_zero_amount(raw: &str) -> bool {
    parse_amount_opt(raw).is_none_or(|d| d.is_zero())
}

/// Non-zero amount or nothing
pub fn non_zero_amount(raw: &str) -> Option<Decimal> {
    parse_amount_opt(raw).filter(|d| !d.is_zero())
}

/// Format with two decimals and an optional currency symbol prefix
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", symbol, rounded.abs())
    } else {
        format!("{}{:.2}", symbol, rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50"), d("12.50"));
        assert_eq!(parse_amount(" $3 "), d("3"));
        assert_eq!(parse_amount("￥ 8.8"), d("8.8"));
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount_opt(""), None);
    }

    #[test]
    fn test_zero_amounts() {
        assert!(is_zero_amount("0"));
        assert!(is_zero_amount("0.0"));
        assert!(is_zero_amount("0.00"));
        assert!(is_zero_amount(""));
        assert!(!is_zero_amount("0.01"));
        assert_eq!(non_zero_amount("0.00"), None);
        assert_eq!(non_zero_amount("2.5"), Some(d("2.5")));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(d("5"), "$"), "$5.00");
        assert_eq!(format_amount(d("12.345"), ""), "12.35");
        assert_eq!(format_amount(d("-1.5"), "$"), "-$1.50");
    }
}
