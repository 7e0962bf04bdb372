//! # Session State
//!
//! Holds the current checkout session for the `session` command.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line                 SessionEvent          CheckoutSession       │
//! │  ──────────                 ────────────          ───────────────       │
//! │                                                                         │
//! │  {"event":"bill",…} ───────► Bill ──────────────► enter_bill()          │
//! │  {"event":"cashback",…} ───► Cashback ──────────► select_cashback()     │
//! │  {"event":"coupon_applied"}► CouponApplied ─────► apply_coupon()        │
//! │  {"event":"coupon_rejected"}► CouponRejected ───► reject_coupon()       │
//! │  {"event":"remove_coupon"} ► RemoveCoupon ──────► remove_coupon()       │
//! │                                                                         │
//! │  The stored session is REPLACED with the returned value, never edited. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use slash_core::{CheckoutSession, Money};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CliError;

/// One user action on the pay screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Bill field text changed.
    Bill { input: String },
    /// Cashback slider moved.
    Cashback { amount: String },
    /// Coupon service accepted a code.
    CouponApplied { discount: String, label: String },
    /// Coupon service refused a code.
    CouponRejected { reason: String },
    RemoveCoupon,
}

/// Result of applying one event.
#[derive(Debug, Clone)]
pub struct Transition {
    pub changed: bool,
    pub session: CheckoutSession,
}

/// The live session behind a mutex.
///
/// Only one event is processed at a time; readers get a clone of the value.
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    session: Mutex<CheckoutSession>,
}

impl SessionState {
    pub fn new(session: CheckoutSession) -> Self {
        SessionState {
            id: Uuid::new_v4(),
            session: Mutex::new(session),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> CheckoutSession {
        self.lock().clone()
    }

    /// Applies an event and stores the resulting session.
    ///
    /// On error the stored session is left as it was.
    pub fn apply(&self, event: &SessionEvent) -> Result<Transition, CliError> {
        let mut guard = self.lock();
        let next = next_session(&guard, event)?;
        let changed = next.changed_from(&guard);

        if changed {
            debug!(
                session = %self.id,
                ?event,
                grand_total = %next.totals().grand_total,
                "Session updated"
            );
        } else {
            debug!(session = %self.id, ?event, "Event left session unchanged");
        }

        *guard = next.clone();
        Ok(Transition {
            changed,
            session: next,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CheckoutSession> {
        // Sessions are swapped whole, so a poisoned value is still consistent.
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn next_session(session: &CheckoutSession, event: &SessionEvent) -> Result<CheckoutSession, CliError> {
    let next = match event {
        SessionEvent::Bill { input } => {
            let next = session.enter_bill(input);
            if let Some(message) = &next.state().bill_error {
                warn!(input = %input, "Bill field error: {}", message);
            }
            next
        }
        SessionEvent::Cashback { amount } => session.select_cashback(Money::parse(amount)?),
        SessionEvent::CouponApplied { discount, label } => {
            session.apply_coupon(Money::parse(discount)?, label.clone())?
        }
        SessionEvent::CouponRejected { reason } => session.reject_coupon(reason.clone())?,
        SessionEvent::RemoveCoupon => session.remove_coupon(),
    };
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use slash_core::{CheckoutPolicy, Rate, StorePricingPolicy};

    fn state() -> SessionState {
        let store =
            StorePricingPolicy::new("store-1", "Chai Point", Rate::from_bps(1000), Money::from_rupees(300))
                .unwrap();
        SessionState::new(CheckoutSession::new(
            store,
            CheckoutPolicy::default(),
            Money::from_rupees(500),
        ))
    }

    fn event(json: &str) -> SessionEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_events_parse_from_json() {
        assert_eq!(
            event(r#"{"event":"bill","input":"500"}"#),
            SessionEvent::Bill {
                input: "500".to_string()
            }
        );
        assert_eq!(event(r#"{"event":"remove_coupon"}"#), SessionEvent::RemoveCoupon);
    }

    #[test]
    fn test_apply_replaces_session() {
        let state = state();
        let t = state.apply(&event(r#"{"event":"bill","input":"1000"}"#)).unwrap();
        assert!(t.changed);
        assert_eq!(state.current(), t.session);

        let t = state
            .apply(&event(r#"{"event":"cashback","amount":"250"}"#))
            .unwrap();
        assert_eq!(t.session.state().selected_cashback, Money::from_rupees(200));
    }

    #[test]
    fn test_repeated_event_reports_no_change() {
        let state = state();
        state.apply(&event(r#"{"event":"bill","input":"500"}"#)).unwrap();
        let t = state.apply(&event(r#"{"event":"bill","input":"500"}"#)).unwrap();
        assert!(!t.changed);
    }

    #[test]
    fn test_failed_event_keeps_previous_session() {
        let state = state();
        state.apply(&event(r#"{"event":"bill","input":"500"}"#)).unwrap();
        state
            .apply(&event(r#"{"event":"coupon_applied","discount":"50","label":"FLAT50"}"#))
            .unwrap();
        let before = state.current();

        let err = state
            .apply(&event(r#"{"event":"coupon_applied","discount":"80","label":"NEW80"}"#))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponError);
        assert_eq!(state.current(), before);

        let err = state
            .apply(&event(r#"{"event":"cashback","amount":"lots"}"#))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(state.current(), before);
    }
}
