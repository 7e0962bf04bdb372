//! # Checkout Module
//!
//! The pay-screen calculator: bill → vendor discount → cashback → coupon →
//! tax → grand total.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    recalculate(state, store, policy)                    │
//! │                                                                         │
//! │  bill_amount ≤ 0 ? ──yes──► all zero, discount not applicable           │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  vendor_discount = bill × store% if bill ≥ minimum order, else 0        │
//! │  tax             = bill × 2.72%          (raw bill, NOT discounted)     │
//! │  cashback        = selected, ≤ min(wallet, bill × 20%)                  │
//! │  coupon          = flat amount resolved by the coupon service           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_savings = vendor_discount + cashback + coupon                    │
//! │  grand_total   = max(0, bill + tax − total_savings)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Values, Not Mutation
//! Every transition takes `&CheckoutState` and returns a new one. Callers
//! compare old and new with `==` to decide whether to re-render.
//!
//! ## Tax Base
//! Tax is charged on the bill as entered. Discounts, cashback and coupons do
//! not shrink the taxable base. This is a business rule of the platform and
//! is pinned by tests below; do not "fix" it here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CheckoutPolicy, CouponState, StorePricingPolicy};
use crate::validation::{validate_bill_amount, validate_non_negative};

// =============================================================================
// Checkout State
// =============================================================================

/// User input for one checkout session.
///
/// ## Invariants
/// - `bill_amount ≥ 0` (unparsable text counts as 0)
/// - `0 ≤ selected_cashback ≤ min(available_cashback, bill_amount × cap)`
/// - `coupon_error` is only set while the coupon is `NotApplied`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutState {
    /// Bill text exactly as typed.
    pub bill_input: String,

    /// Parsed bill; zero when the text is empty or invalid.
    pub bill_amount: Money,

    /// Message shown under the bill field.
    pub bill_error: Option<String>,

    /// Wallet balance, read-only for the session.
    pub available_cashback: Money,

    /// Cashback the user chose to spend.
    pub selected_cashback: Money,

    pub coupon: CouponState,

    /// Last coupon rejection reason.
    pub coupon_error: Option<String>,
}

impl CheckoutState {
    /// Starts a checkout with an empty bill.
    pub fn new(available_cashback: Money) -> Self {
        CheckoutState {
            bill_input: String::new(),
            bill_amount: Money::zero(),
            bill_error: None,
            available_cashback: available_cashback.floor_zero(),
            selected_cashback: Money::zero(),
            coupon: CouponState::NotApplied,
            coupon_error: None,
        }
    }

    /// Current cashback ceiling.
    pub fn max_allowed_cashback(&self, policy: &CheckoutPolicy) -> Money {
        policy.max_allowed_cashback(self.bill_amount, self.available_cashback)
    }
}

// =============================================================================
// Checkout Totals
// =============================================================================

/// Derived amounts shown in the bill summary. Never stored on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutTotals {
    pub bill_amount: Money,
    pub vendor_discount: Money,
    pub vendor_discount_applicable: bool,
    pub cashback: Money,
    pub max_allowed_cashback: Money,
    pub coupon_discount: Money,
    pub tax: Money,
    pub total_savings: Money,
    pub grand_total: Money,
}

/// Computes the bill summary for the current state.
///
/// Pure and cheap: safe to call on every keystroke.
///
/// ## Example
/// ```rust
/// use slash_core::checkout::{recalculate, update_bill_amount, CheckoutState};
/// use slash_core::money::Money;
/// use slash_core::types::{CheckoutPolicy, Rate, StorePricingPolicy};
///
/// let store = StorePricingPolicy::new("s1", "Cafe", Rate::from_bps(1000), Money::from_rupees(300)).unwrap();
/// let policy = CheckoutPolicy::default();
/// let state = update_bill_amount(&CheckoutState::new(Money::zero()), Money::from_rupees(500), &policy);
///
/// let totals = recalculate(&state, &store, &policy);
/// assert_eq!(totals.vendor_discount, Money::from_rupees(50));
/// assert_eq!(totals.tax, Money::from_paise(1360));
/// assert_eq!(totals.grand_total, Money::from_paise(46360));
/// ```
pub fn recalculate(
    state: &CheckoutState,
    store: &StorePricingPolicy,
    policy: &CheckoutPolicy,
) -> CheckoutTotals {
    let bill_amount = state.bill_amount;
    if !bill_amount.is_positive() {
        return CheckoutTotals::default();
    }

    let vendor_discount_applicable = store.discount_applies(bill_amount);
    let vendor_discount = if vendor_discount_applicable {
        bill_amount.percent_of(store.normal_discount)
    } else {
        Money::zero()
    };

    let tax = bill_amount.percent_of(policy.tax_rate);

    // Hand-built states still respect the cap.
    let max_allowed_cashback = state.max_allowed_cashback(policy);
    let cashback = state.selected_cashback.floor_zero().min(max_allowed_cashback);

    let coupon_discount = state.coupon.discount();
    let total_savings = vendor_discount + cashback + coupon_discount;
    let grand_total = (bill_amount + tax - total_savings).floor_zero();

    CheckoutTotals {
        bill_amount,
        vendor_discount,
        vendor_discount_applicable,
        cashback,
        max_allowed_cashback,
        coupon_discount,
        tax,
        total_savings,
        grand_total,
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Sets a new bill amount and re-clamps the selected cashback.
///
/// Cashback above the new cap is reduced silently: a clamp, not an error.
pub fn update_bill_amount(
    state: &CheckoutState,
    new_amount: Money,
    policy: &CheckoutPolicy,
) -> CheckoutState {
    let bill_amount = new_amount.floor_zero();
    let cap = policy.max_allowed_cashback(bill_amount, state.available_cashback);

    CheckoutState {
        bill_amount,
        selected_cashback: state.selected_cashback.min(cap),
        ..state.clone()
    }
}

/// Applies keypad text to the bill field.
///
/// Parses once: the validation message goes to `bill_error`, and the amount
/// used for totals is the parsed value (or zero when it does not parse).
pub fn update_bill_input(
    state: &CheckoutState,
    input: &str,
    store: &StorePricingPolicy,
    policy: &CheckoutPolicy,
) -> CheckoutState {
    let bill_error = validate_bill_amount(input, store, policy).error_message();
    let amount = Money::parse(input).unwrap_or_default();

    let next = update_bill_amount(state, amount, policy);
    CheckoutState {
        bill_input: input.to_string(),
        bill_error,
        ..next
    }
}

/// Moves the cashback slider.
///
/// The request is clamped into `[0, max_allowed_cashback]`.
pub fn on_cashback_change(
    state: &CheckoutState,
    requested: Money,
    policy: &CheckoutPolicy,
) -> CheckoutState {
    let cap = state.max_allowed_cashback(policy);

    CheckoutState {
        selected_cashback: requested.floor_zero().min(cap),
        ..state.clone()
    }
}

/// Records a coupon the coupon service accepted.
///
/// ## Errors
/// - [`CoreError::CouponAlreadyApplied`] while another coupon is on the bill
/// - [`CoreError::Validation`] for a negative discount
pub fn apply_coupon(
    state: &CheckoutState,
    resolved_discount: Money,
    label: impl Into<String>,
) -> CoreResult<CheckoutState> {
    if let CouponState::Applied { label, .. } = &state.coupon {
        return Err(CoreError::CouponAlreadyApplied {
            label: label.clone(),
        });
    }
    validate_non_negative("coupon discount", resolved_discount)?;

    Ok(CheckoutState {
        coupon: CouponState::Applied {
            discount: resolved_discount,
            label: label.into(),
        },
        coupon_error: None,
        ..state.clone()
    })
}

/// Records a coupon the coupon service refused.
///
/// The coupon stays `NotApplied` and the reason is attached for display.
/// The user may resubmit; nothing retries automatically.
pub fn reject_coupon(state: &CheckoutState, reason: impl Into<String>) -> CoreResult<CheckoutState> {
    if let CouponState::Applied { label, .. } = &state.coupon {
        return Err(CoreError::CouponAlreadyApplied {
            label: label.clone(),
        });
    }

    Ok(CheckoutState {
        coupon_error: Some(reason.into()),
        ..state.clone()
    })
}

/// Takes the coupon off the bill.
pub fn remove_coupon(state: &CheckoutState) -> CheckoutState {
    CheckoutState {
        coupon: CouponState::NotApplied,
        coupon_error: None,
        ..state.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
