//! # Domain Types
//!
//! Value types shared by the checkout calculator and its callers.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                    │
//! │  │  StorePricingPolicy  │   │   CheckoutPolicy     │                    │
//! │  │  ──────────────────  │   │  ──────────────────  │                    │
//! │  │  normal_discount     │   │  tax_rate   (2.72%)  │                    │
//! │  │  minimum_order       │   │  cashback_cap (20%)  │                    │
//! │  │  (per store)         │   │  max_bill (₹1 lakh)  │                    │
//! │  └──────────────────────┘   └──────────────────────┘                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                    │
//! │  │        Rate          │   │    CouponState       │                    │
//! │  │  ──────────────────  │   │  ──────────────────  │                    │
//! │  │  bps (u32)           │   │  NotApplied          │                    │
//! │  │  272 = 2.72%         │   │  Applied{discount,…} │                    │
//! │  └──────────────────────┘   └──────────────────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::validation::{validate_non_negative, validate_rate_bps, ValidationResult};
use crate::{DEFAULT_CASHBACK_CAP_BPS, DEFAULT_MAX_BILL_AMOUNT, DEFAULT_TAX_RATE_BPS};

// =============================================================================
// Rate
// =============================================================================

/// A percentage held in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so every rate the backend sends
/// ("10", "12.5", "2.72") is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Parses a percentage string such as `"10"` or `"2.72"`.
    ///
    /// ```rust
    /// use slash_core::types::Rate;
    ///
    /// assert_eq!(Rate::parse_percent("discount", "12.5").unwrap().bps(), 1250);
    /// assert!(Rate::parse_percent("discount", "101").is_err());
    /// ```
    pub fn parse_percent(field: &str, input: &str) -> ValidationResult<Self> {
        let hundredths = money::parse_hundredths(input).ok_or_else(|| {
            ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be a percentage with at most two decimals".to_string(),
            }
        })?;

        if hundredths < 0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }

        let bps = u32::try_from(hundredths).map_err(|_| ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10000,
        })?;
        validate_rate_bps(field, bps)?;
        Ok(Rate(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// `10%`, `2.72%`, `12.50%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;
        if fraction == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:02}%", whole, fraction)
        }
    }
}

// =============================================================================
// Store Pricing Policy
// =============================================================================

/// A store's discount terms, fetched once per checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StorePricingPolicy {
    /// Backend store identifier.
    pub store_id: String,

    /// Display name shown on the pay screen.
    pub store_name: String,

    /// Percentage the store funds once the minimum order is met.
    pub normal_discount: Rate,

    /// Bill threshold below which no vendor discount applies.
    pub minimum_order_amount: Money,
}

impl StorePricingPolicy {
    /// Creates a validated pricing policy.
    ///
    /// ## Rules
    /// - Discount between 0% and 100%
    /// - Minimum order not negative
    pub fn new(
        store_id: impl Into<String>,
        store_name: impl Into<String>,
        normal_discount: Rate,
        minimum_order_amount: Money,
    ) -> ValidationResult<Self> {
        validate_rate_bps("normal discount", normal_discount.bps())?;
        validate_non_negative("minimum order amount", minimum_order_amount)?;

        Ok(StorePricingPolicy {
            store_id: store_id.into(),
            store_name: store_name.into(),
            normal_discount,
            minimum_order_amount,
        })
    }

    /// Whether the bill qualifies for the vendor discount.
    ///
    /// A threshold, not a scale: the full discount applies at or above the
    /// minimum and nothing applies below it.
    #[inline]
    pub fn discount_applies(&self, bill_amount: Money) -> bool {
        bill_amount.is_positive() && bill_amount >= self.minimum_order_amount
    }
}

// =============================================================================
// Checkout Policy
// =============================================================================

/// Platform-wide checkout constants.
///
/// These were literals in every pay screen; here they are inputs so they can
/// change without touching the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutPolicy {
    /// Surcharge on the original bill (2.72%).
    pub tax_rate: Rate,

    /// Share of the bill payable with wallet cashback (20%).
    pub cashback_cap_rate: Rate,

    /// Largest bill accepted in one checkout (₹1,00,000).
    pub max_bill_amount: Money,
}

impl CheckoutPolicy {
    /// Creates a validated checkout policy.
    pub fn new(tax_rate: Rate, cashback_cap_rate: Rate, max_bill_amount: Money) -> ValidationResult<Self> {
        validate_rate_bps("tax rate", tax_rate.bps())?;
        validate_rate_bps("cashback cap", cashback_cap_rate.bps())?;
        if !max_bill_amount.is_positive() {
            return Err(ValidationError::AmountNotPositive);
        }

        Ok(CheckoutPolicy {
            tax_rate,
            cashback_cap_rate,
            max_bill_amount,
        })
    }

    /// Largest cashback usable against a bill of this size.
    ///
    /// `min(available, bill × cap)`, never negative.
    pub fn max_allowed_cashback(&self, bill_amount: Money, available_cashback: Money) -> Money {
        let bill_cap = bill_amount.floor_zero().percent_of(self.cashback_cap_rate);
        available_cashback.floor_zero().min(bill_cap)
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy {
            tax_rate: Rate::from_bps(DEFAULT_TAX_RATE_BPS),
            cashback_cap_rate: Rate::from_bps(DEFAULT_CASHBACK_CAP_BPS),
            max_bill_amount: DEFAULT_MAX_BILL_AMOUNT,
        }
    }
}

// =============================================================================
// Coupon State
// =============================================================================

/// Coupon lifecycle on one checkout.
///
/// ```text
/// NotApplied ──(validation succeeds)──► Applied ──(remove)──► NotApplied
///     │
///     └──(validation fails)──► NotApplied + error message
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CouponState {
    NotApplied,
    /// Discount resolved by the coupon service; never recomputed locally.
    Applied { discount: Money, label: String },
}

impl CouponState {
    /// Flat discount of the applied coupon, or zero.
    pub fn discount(&self) -> Money {
        match self {
            CouponState::NotApplied => Money::zero(),
            CouponState::Applied { discount, .. } => *discount,
        }
    }
}

impl Default for CouponState {
    fn default() -> Self {
        CouponState::NotApplied
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
