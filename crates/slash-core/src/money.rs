//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Bill ₹500 with 2.72% surcharge as f64:                                 │
//! │    500.0 * 0.0272 = 13.600000000000001  ❌                              │
//! │                                                                         │
//! │  Every amount arrives from the API and the keypad as TEXT.              │
//! │  Parsing it to f64 in each screen gave slightly different answers.     │
//! │                                                                         │
//! │  OUR SOLUTION: parse once into integer paise                            │
//! │    "500"    → 50000 paise                                               │
//! │    "13.6"   →  1360 paise                                               │
//! │    50000 × 272 bps / 10000 = 1360 paise = ₹13.60 exactly               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use slash_core::money::Money;
//!
//! let bill = Money::parse("500").unwrap();
//! assert_eq!(bill.paise(), 50_000);
//! assert_eq!(bill.to_string(), "₹500.00");
//! assert_eq!(Money::from_rupees(100_000).to_short_string(), "₹1,00,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;

/// Paise in one rupee.
const PAISE_PER_RUPEE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of a rupee).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Bill keypad "500" ──► Money::parse ──► CheckoutState.bill_amount       │
/// │                                                │                        │
/// │  Wallet balance ─────► available_cashback      ▼                        │
/// │                                          recalculate()                  │
/// │  Coupon service ─────► coupon discount         │                        │
/// │                                                ▼                        │
/// │                              CheckoutTotals.grand_total ──► UPI link    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ```rust
    /// use slash_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(300).paise(), 30_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Parses a user- or API-supplied amount.
    ///
    /// ## Accepted Forms
    /// - `"500"`, `"500.5"`, `"500.50"`, `".5"`, `"500."`
    /// - an optional leading sign, surrounding whitespace
    ///
    /// Anything else (letters, grouping commas, more than two decimal places,
    /// overflow) is [`ValidationError::InvalidAmount`].
    ///
    /// ```rust
    /// use slash_core::money::Money;
    ///
    /// assert_eq!(Money::parse("13.6").unwrap().paise(), 1360);
    /// assert!(Money::parse("abc").is_err());
    /// assert!(Money::parse("1.005").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        parse_hundredths(input)
            .map(Money)
            .ok_or(ValidationError::InvalidAmount)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the amount, or zero if it is negative.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Takes a percentage of this amount, rounded half-up to the paisa.
    ///
    /// ## Implementation
    /// `(paise × bps + 5000) / 10000` in i128, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use slash_core::money::Money;
    /// use slash_core::types::Rate;
    ///
    /// let bill = Money::from_rupees(500);
    /// assert_eq!(bill.percent_of(Rate::from_bps(272)).paise(), 1360); // ₹13.60
    /// assert_eq!(bill.percent_of(Rate::from_bps(1000)).paise(), 5000); // ₹50.00
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Money {
        let paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(i64::try_from(paise).unwrap_or(if paise < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Plain decimal form with two places, no symbol: `463.60`.
    ///
    /// This is the format payment intents expect for the amount field.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }

    /// Display form that drops a zero paise part: `₹300`, `₹1,00,000`, `₹99.50`.
    ///
    /// Used in field messages where the amount came from a whole-rupee policy.
    pub fn to_short_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = group_indian(self.rupees().unsigned_abs());
        if self.paise_part() == 0 {
            format!("{}₹{}", sign, whole)
        } else {
            format!("{}₹{}.{:02}", sign, whole, self.paise_part())
        }
    }
}

// =============================================================================
// Parsing & Formatting Helpers
// =============================================================================

/// Parses a decimal with at most two fractional digits into hundredths.
///
/// Shared by [`Money::parse`] and [`Rate::parse_percent`], which both hold
/// two implied decimal places.
pub(crate) fn parse_hundredths(input: &str) -> Option<i64> {
    let text = input.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let magnitude = whole_value.checked_mul(100)?.checked_add(fraction_value)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Groups digits the Indian way: `1234567` → `12,34,567`.
fn group_indian(whole: u64) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Full display form: `₹1,23,456.70`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            group_indian(self.rupees().unsigned_abs()),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Saturating: parsed input can reach the i64 range.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise_and_parts() {
        let money = Money::from_paise(46360);
        assert_eq!(money.rupees(), 463);
        assert_eq!(money.paise_part(), 60);
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(Money::parse("500").unwrap().paise(), 50_000);
        assert_eq!(Money::parse(" 500.5 ").unwrap().paise(), 50_050);
        assert_eq!(Money::parse("500.50").unwrap().paise(), 50_050);
        assert_eq!(Money::parse(".5").unwrap().paise(), 50);
        assert_eq!(Money::parse("7.").unwrap().paise(), 700);
        assert_eq!(Money::parse("+3").unwrap().paise(), 300);
        assert_eq!(Money::parse("-12.25").unwrap().paise(), -1225);
        assert_eq!(Money::parse("0").unwrap(), Money::zero());
    }

    #[test]
    fn test_parse_rejected_forms() {
        for input in ["", "   ", "abc", "12a", "1,000", "1.234", ".", "-", "1.2.3", "₹500"] {
            assert_eq!(
                Money::parse(input),
                Err(ValidationError::InvalidAmount),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_overflow_is_invalid() {
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(46360).to_string(), "₹463.60");
        assert_eq!(Money::from_rupees(100_000).to_string(), "₹1,00,000.00");
        assert_eq!(Money::from_paise(12_345_670).to_string(), "₹1,23,456.70");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_short_string() {
        assert_eq!(Money::from_rupees(300).to_short_string(), "₹300");
        assert_eq!(Money::from_rupees(100_000).to_short_string(), "₹1,00,000");
        assert_eq!(Money::from_paise(9950).to_short_string(), "₹99.50");
        assert_eq!(Money::from_rupees(1_234_567).to_short_string(), "₹12,34,567");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_paise(46360).to_decimal_string(), "463.60");
        assert_eq!(Money::from_paise(5).to_decimal_string(), "0.05");
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // ₹0.50 at 1% = 0.5 paise → 1 paisa
        assert_eq!(Money::from_paise(50).percent_of(Rate::from_bps(100)).paise(), 1);
        // ₹100 at 2.72% = ₹2.72 exactly
        assert_eq!(Money::from_rupees(100).percent_of(Rate::from_bps(272)).paise(), 272);
        // ₹333.33 at 2.72% = 906.6576 paise → 907
        assert_eq!(Money::from_paise(33_333).percent_of(Rate::from_bps(272)).paise(), 907);
    }

    #[test]
    fn test_floor_zero_and_arithmetic() {
        let a = Money::from_rupees(100);
        let b = Money::from_rupees(150);
        assert_eq!((a - b).floor_zero(), Money::zero());
        assert_eq!((b - a).floor_zero(), Money::from_rupees(50));
        let total: Money = [a, b].into_iter().sum();
        assert_eq!(total, Money::from_rupees(250));
    }

    #[test]
    fn test_arithmetic_saturates_at_bounds() {
        let huge = Money::from_paise(i64::MAX - 10);
        assert_eq!(huge + Money::from_rupees(1), Money::from_paise(i64::MAX));
        assert_eq!(Money::from_paise(i64::MIN + 10) - Money::from_rupees(1), Money::from_paise(i64::MIN));
    }

    #[test]
    fn test_percent_of_saturates_for_oversized_rate() {
        let huge = Money::from_paise(i64::MAX);
        assert_eq!(huge.percent_of(Rate::from_bps(20_000)), Money::from_paise(i64::MAX));
        assert_eq!(Money::from_paise(i64::MIN).percent_of(Rate::from_bps(20_000)), Money::from_paise(i64::MIN));
        // Unvalidated rates above 100% still compute exactly when they fit.
        assert_eq!(Money::from_rupees(10).percent_of(Rate::from_bps(15_000)), Money::from_rupees(15));
    }

    #[test]
    fn test_float_drift_avoided() {
        // 500 × 0.0272 drifts in f64; paise math is exact
        let tax = Money::parse("500").unwrap().percent_of(Rate::from_bps(272));
        assert_eq!(tax, Money::parse("13.6").unwrap());
    }
}
