//! # Checkout Session
//!
//! One pay-screen visit: the store's terms, the platform policy, the user's
//! input and the totals derived from it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session ──enter_bill("500")──► session' ──select_cashback(80)──► …     │
//! │     │                              │                                    │
//! │     └── totals                     └── totals' (recalculated)           │
//! │                                                                         │
//! │  Each step returns a NEW session; the old one is untouched.             │
//! │  `changed_from` tells the caller whether to re-render.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::checkout::{self, CheckoutState, CheckoutTotals};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{CheckoutPolicy, StorePricingPolicy};

/// Immutable checkout session value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    store: StorePricingPolicy,
    policy: CheckoutPolicy,
    state: CheckoutState,
    totals: CheckoutTotals,
}

impl CheckoutSession {
    /// Opens a session with an empty bill.
    pub fn new(store: StorePricingPolicy, policy: CheckoutPolicy, available_cashback: Money) -> Self {
        Self::from_parts(store, policy, CheckoutState::new(available_cashback))
    }

    fn from_parts(store: StorePricingPolicy, policy: CheckoutPolicy, state: CheckoutState) -> Self {
        let totals = checkout::recalculate(&state, &store, &policy);
        CheckoutSession {
            store,
            policy,
            state,
            totals,
        }
    }

    fn with_state(&self, state: CheckoutState) -> Self {
        Self::from_parts(self.store.clone(), self.policy, state)
    }

    pub fn store(&self) -> &StorePricingPolicy {
        &self.store
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn totals(&self) -> &CheckoutTotals {
        &self.totals
    }

    /// Amount to collect from the user.
    pub fn payable(&self) -> Money {
        self.totals.grand_total
    }

    /// Whether the bill field currently holds a payable amount.
    pub fn can_pay(&self) -> bool {
        self.state.bill_error.is_none() && self.state.bill_amount.is_positive()
    }

    /// Equality-based change detection against an earlier session.
    pub fn changed_from(&self, previous: &CheckoutSession) -> bool {
        self != previous
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Keypad text for the bill field.
    pub fn enter_bill(&self, input: &str) -> Self {
        self.with_state(checkout::update_bill_input(
            &self.state,
            input,
            &self.store,
            &self.policy,
        ))
    }

    /// Already-parsed bill amount (e.g. from a scanned QR payload).
    ///
    /// The amount is written back into the bill field as `463.60` text so the
    /// field error and [`can_pay`](Self::can_pay) follow the same rules as typed input.
    pub fn set_bill_amount(&self, amount: Money) -> Self {
        self.enter_bill(&amount.to_decimal_string())
    }

    pub fn select_cashback(&self, requested: Money) -> Self {
        self.with_state(checkout::on_cashback_change(&self.state, requested, &self.policy))
    }

    pub fn apply_coupon(&self, discount: Money, label: impl Into<String>) -> CoreResult<Self> {
        Ok(self.with_state(checkout::apply_coupon(&self.state, discount, label)?))
    }

    pub fn reject_coupon(&self, reason: impl Into<String>) -> CoreResult<Self> {
        Ok(self.with_state(checkout::reject_coupon(&self.state, reason)?))
    }

    pub fn remove_coupon(&self) -> Self {
        self.with_state(checkout::remove_coupon(&self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rate;

    fn session() -> CheckoutSession {
        let store =
            StorePricingPolicy::new("store-1", "Chai Point", Rate::from_bps(1000), Money::from_rupees(300))
                .unwrap();
        CheckoutSession::new(store, CheckoutPolicy::default(), Money::from_rupees(500))
    }

    #[test]
    fn test_new_session_is_all_zero() {
        let s = session();
        assert_eq!(*s.totals(), CheckoutTotals::default());
        assert!(!s.can_pay());
    }

    #[test]
    fn test_transitions_recalculate() {
        let s = session().enter_bill("1000").select_cashback(Money::from_rupees(250));

        assert_eq!(s.state().selected_cashback, Money::from_rupees(200));
        assert_eq!(s.totals().vendor_discount, Money::from_rupees(100));
        assert_eq!(s.totals().tax, Money::from_rupees(27) + Money::from_paise(20));
        // 1000 + 27.20 − 100 − 200
        assert_eq!(s.payable(), Money::from_paise(72_720));
        assert!(s.can_pay());
    }

    #[test]
    fn test_previous_session_untouched() {
        let before = session().enter_bill("500");
        let after = before.apply_coupon(Money::from_rupees(50), "FLAT50").unwrap();

        assert!(after.changed_from(&before));
        assert_eq!(before.totals().coupon_discount, Money::zero());
        assert_eq!(after.totals().coupon_discount, Money::from_rupees(50));
    }

    #[test]
    fn test_no_op_transition_is_not_a_change() {
        let s = session().enter_bill("500");
        assert!(!s.enter_bill("500").changed_from(&s));
        assert!(!s.remove_coupon().changed_from(&s));
    }

    #[test]
    fn test_invalid_bill_blocks_payment_but_not_other_fields() {
        let s = session().enter_bill("abc").select_cashback(Money::from_rupees(10));
        assert!(!s.can_pay());
        assert_eq!(s.state().bill_error.as_deref(), Some("Invalid amount"));
        // Cap is zero with a zero bill.
        assert_eq!(s.state().selected_cashback, Money::zero());
    }

    #[test]
    fn test_set_bill_amount_revalidates_field() {
        let s = session().enter_bill("abc");
        assert!(!s.can_pay());

        let s = s.set_bill_amount(Money::from_rupees(500));
        assert_eq!(s.state().bill_input, "500.00");
        assert_eq!(s.state().bill_error, None);
        assert!(s.can_pay());
        assert_eq!(s.payable(), Money::from_paise(46360));

        let s = s.set_bill_amount(Money::from_rupees(500_000));
        assert_eq!(
            s.state().bill_error.as_deref(),
            Some("Amount cannot exceed ₹1,00,000")
        );
        assert!(!s.can_pay());

        let s = s.set_bill_amount(Money::from_rupees(200));
        assert_eq!(s.state().bill_error.as_deref(), Some("Minimum order amount is ₹300"));
        assert!(!s.can_pay());
    }

    #[test]
    fn test_coupon_rejection_round_trip() {
        let s = session().enter_bill("500");
        let rejected = s.reject_coupon("Invalid coupon code").unwrap();
        assert_eq!(rejected.state().coupon_error.as_deref(), Some("Invalid coupon code"));
        assert_eq!(rejected.payable(), s.payable());
    }
}
