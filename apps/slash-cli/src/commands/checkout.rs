//! # Checkout Commands
//!
//! `quote`, `validate`, `pay` and the line-driven `session`.
//!
//! ## Pay Screen Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │ Scan QR  │────►│  Enter   │────►│ Cashback │────►│   Pay    │       │
//! │  │ (store)  │     │  bill    │     │ / coupon │     │  (UPI)   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                │                │              │
//! │                    validate          session           pay             │
//! │                        └────── quote (all at once) ──────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use clap::Args;
use serde::Serialize;
use serde_json::json;
use slash_core::upi::{upi_payment_uri, UpiPayment};
use slash_core::validation::{validate_bill_amount, BillAmountValidation};
use slash_core::{CheckoutSession, CheckoutState, CheckoutTotals, Money, Rate, StorePricingPolicy};
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::state::{ConfigState, SessionEvent, SessionState};

// =============================================================================
// Arguments
// =============================================================================

/// Store terms, as returned by the store-details endpoint.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    #[arg(long, default_value = "walk-in", help = "Store identifier")]
    pub store_id: String,

    #[arg(long, default_value = "Slash Partner Store", help = "Store display name")]
    pub store_name: String,

    #[arg(long, default_value = "0", help = "Store discount percentage, e.g. 10")]
    pub discount: String,

    #[arg(long, default_value = "0", help = "Minimum order amount in rupees")]
    pub min_order: String,
}

impl StoreArgs {
    pub fn policy(&self) -> Result<StorePricingPolicy, CliError> {
        let discount = Rate::parse_percent("discount", &self.discount)?;
        let minimum = Money::parse(&self.min_order)?;
        Ok(StorePricingPolicy::new(
            self.store_id.clone(),
            self.store_name.clone(),
            discount,
            minimum,
        )?)
    }
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, help = "Bill amount as typed, e.g. 500 or 499.50")]
    pub bill: String,

    #[arg(long, default_value = "0", help = "Wallet cashback balance in rupees")]
    pub wallet: String,

    #[arg(long, default_value = "0", help = "Cashback to spend (clamped to the cap)")]
    pub cashback: String,

    #[arg(long, help = "Flat discount resolved for an applied coupon")]
    pub coupon: Option<String>,

    #[arg(long, default_value = "COUPON", help = "Label shown for the coupon")]
    pub coupon_label: String,

    #[arg(long, help = "Print JSON instead of a bill summary")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, help = "Bill amount as typed")]
    pub bill: String,
}

#[derive(Debug, Clone, Args)]
pub struct PayArgs {
    #[command(flatten)]
    pub quote: QuoteArgs,

    #[arg(long, help = "Payee UPI id (defaults to SLASH_UPI_VPA)")]
    pub vpa: Option<String>,

    #[arg(long, help = "Payee name (defaults to SLASH_UPI_NAME, then store name)")]
    pub payee_name: Option<String>,

    #[arg(long, help = "Transaction reference")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, default_value = "0", help = "Wallet cashback balance in rupees")]
    pub wallet: String,
}

// =============================================================================
// quote
// =============================================================================

/// Builds a session from one-shot arguments.
///
/// The steps run in the same order the pay screen fires them: bill, then
/// cashback, then coupon.
pub fn quote(config: &ConfigState, args: &QuoteArgs) -> Result<CheckoutSession, CliError> {
    let store = args.store.policy()?;
    let policy = config.checkout_policy()?;
    let wallet = Money::parse(&args.wallet)?;

    let mut session = CheckoutSession::new(store, policy, wallet)
        .enter_bill(&args.bill)
        .select_cashback(Money::parse(&args.cashback)?);

    if let Some(discount) = &args.coupon {
        session = session.apply_coupon(Money::parse(discount)?, args.coupon_label.clone())?;
    }

    if let Some(message) = &session.state().bill_error {
        warn!(bill = %args.bill, "Bill field error: {}", message);
    }
    debug!(totals = ?session.totals(), "Quote calculated");
    Ok(session)
}

/// JSON shape shared by `quote --json` and `session` lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReport<'a> {
    pub state: &'a CheckoutState,
    pub totals: &'a CheckoutTotals,
    pub payable: String,
}

impl<'a> QuoteReport<'a> {
    pub fn new(session: &'a CheckoutSession) -> Self {
        QuoteReport {
            state: session.state(),
            totals: session.totals(),
            payable: session.payable().to_decimal_string(),
        }
    }
}

/// Renders the bill summary shown before paying.
///
/// ```text
/// Chai Point
///   Bill amount                       ₹500.00
///   Store discount (10%)              -₹50.00
///   Convenience fee (2.72%)           +₹13.60
///   ──────────────────────────────────────────
///   To pay                            ₹463.60
///   You save                           ₹50.00
/// ```
pub fn render_summary(session: &CheckoutSession) -> String {
    let store = session.store();
    let totals = session.totals();
    let state = session.state();
    let mut lines = vec![store.store_name.clone()];

    let mut row = |label: String, value: String| lines.push(format!("  {:<30}{:>14}", label, value));

    row("Bill amount".to_string(), totals.bill_amount.to_string());
    if totals.vendor_discount_applicable {
        row(
            format!("Store discount ({})", store.normal_discount),
            format!("-{}", totals.vendor_discount),
        );
    } else if !store.normal_discount.is_zero() {
        row(
            format!("Store discount ({})", store.normal_discount),
            format!("min {}", store.minimum_order_amount.to_short_string()),
        );
    }
    if totals.cashback.is_positive() {
        row("Cashback".to_string(), format!("-{}", totals.cashback));
    }
    if let slash_core::CouponState::Applied { label, .. } = &state.coupon {
        row(format!("Coupon {}", label), format!("-{}", totals.coupon_discount));
    }
    row(
        format!("Convenience fee ({})", session.policy().tax_rate),
        format!("+{}", totals.tax),
    );
    lines.push(format!("  {}", "─".repeat(44)));
    lines.push(format!("  {:<30}{:>14}", "To pay", totals.grand_total.to_string()));
    lines.push(format!("  {:<30}{:>14}", "You save", totals.total_savings.to_string()));

    if let Some(message) = &state.bill_error {
        lines.push(format!("  ! {}", message));
    }
    lines.join("\n")
}

// =============================================================================
// validate
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateReport {
    pub valid: bool,
    pub amount: Option<Money>,
    pub message: Option<String>,
}

pub fn validate(config: &ConfigState, args: &ValidateArgs) -> Result<ValidateReport, CliError> {
    let store = args.store.policy()?;
    let policy = config.checkout_policy()?;

    let outcome = validate_bill_amount(&args.bill, &store, &policy);
    let amount = match &outcome {
        BillAmountValidation::Valid(amount) => Some(*amount),
        _ => None,
    };

    Ok(ValidateReport {
        valid: outcome.is_valid(),
        amount,
        message: outcome.error_message(),
    })
}

// =============================================================================
// pay
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayReport {
    pub payable: Money,
    pub uri: String,
}

/// Quotes the bill and builds the UPI intent for the grand total.
pub fn pay(config: &ConfigState, args: &PayArgs) -> Result<PayReport, CliError> {
    let session = quote(config, &args.quote)?;

    if !session.can_pay() {
        let reason = session
            .state()
            .bill_error
            .clone()
            .unwrap_or_else(|| "Enter a bill amount".to_string());
        return Err(CliError::validation(reason));
    }

    let vpa = args
        .vpa
        .clone()
        .or_else(|| config.upi_vpa.clone())
        .ok_or_else(|| CliError::invalid_input("No payee UPI id: pass --vpa or set SLASH_UPI_VPA"))?;
    let payee_name = args
        .payee_name
        .clone()
        .or_else(|| config.upi_payee_name.clone())
        .unwrap_or_else(|| session.store().store_name.clone());
    let note = format!("Slash bill at {}", session.store().store_name);

    let uri = upi_payment_uri(&UpiPayment {
        payee_vpa: &vpa,
        payee_name: &payee_name,
        amount: session.payable(),
        note: Some(&note),
        transaction_ref: args.reference.as_deref(),
    })?;

    info!(payable = %session.payable(), "Payment link built");
    Ok(PayReport {
        payable: session.payable(),
        uri,
    })
}

// =============================================================================
// session
// =============================================================================

/// Counts from one `session` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub events: usize,
    pub errors: usize,
}

/// Reads JSON-lines events and writes one JSON line per event.
///
/// ```text
/// in : {"event":"bill","input":"500"}
/// out: {"seq":1,"changed":true,"state":{…},"totals":{…},"payable":"463.60"}
/// in : {"event":"coupon_applied","discount":"50","label":"FLAT50"}
/// out: {"seq":2,"changed":true,…}
/// in : not json
/// out: {"seq":3,"error":{"code":"INVALID_INPUT","message":"Malformed JSON: …"}}
/// ```
///
/// Bad lines are reported and skipped; only I/O failures stop the loop.
pub fn run_session<R, W>(state: &SessionState, input: R, mut output: W) -> Result<SessionSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = SessionSummary::default();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.events += 1;
        let seq = summary.events;

        let result = serde_json::from_str::<SessionEvent>(&line)
            .map_err(CliError::from)
            .and_then(|event| state.apply(&event));

        let record = match result {
            Ok(transition) => {
                let report = QuoteReport::new(&transition.session);
                json!({
                    "seq": seq,
                    "changed": transition.changed,
                    "state": report.state,
                    "totals": report.totals,
                    "payable": report.payable,
                })
            }
            Err(err) => {
                summary.errors += 1;
                warn!(session = %state.id(), seq, "Event rejected: {}", err);
                json!({ "seq": seq, "error": err })
            }
        };

        serde_json::to_writer(&mut output, &record)?;
        writeln!(output)?;
    }

    output.flush()?;
    info!(
        session = %state.id(),
        events = summary.events,
        errors = summary.errors,
        "Session finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_args(discount: &str, min_order: &str) -> StoreArgs {
        StoreArgs {
            store_id: "store-1".to_string(),
            store_name: "Chai Point".to_string(),
            discount: discount.to_string(),
            min_order: min_order.to_string(),
        }
    }

    fn quote_args(bill: &str) -> QuoteArgs {
        QuoteArgs {
            store: store_args("10", "300"),
            bill: bill.to_string(),
            wallet: "0".to_string(),
            cashback: "0".to_string(),
            coupon: None,
            coupon_label: "COUPON".to_string(),
            json: false,
        }
    }

    #[test]
    fn test_quote_matches_pay_screen() {
        let session = quote(&ConfigState::default(), &quote_args("500")).unwrap();
        assert_eq!(session.payable(), Money::from_paise(46360));
    }

    #[test]
    fn test_quote_with_cashback_and_coupon() {
        let mut args = quote_args("1000");
        args.wallet = "500".to_string();
        args.cashback = "250".to_string();
        args.coupon = Some("50".to_string());
        args.coupon_label = "FLAT50".to_string();

        let session = quote(&ConfigState::default(), &args).unwrap();
        assert_eq!(session.totals().cashback, Money::from_rupees(200));
        // 1000 + 27.20 − 100 − 200 − 50
        assert_eq!(session.payable(), Money::from_paise(67_720));
    }

    #[test]
    fn test_quote_rejects_bad_store_terms() {
        let mut args = quote_args("500");
        args.store.discount = "ten".to_string();
        assert!(quote(&ConfigState::default(), &args).is_err());
    }

    #[test]
    fn test_summary_lists_each_line() {
        let mut args = quote_args("500");
        args.coupon = Some("50".to_string());
        args.coupon_label = "FLAT50".to_string();
        let summary = render_summary(&quote(&ConfigState::default(), &args).unwrap());

        assert!(summary.starts_with("Chai Point"));
        assert!(summary.contains("Store discount (10%)"));
        assert!(summary.contains("-₹50.00"));
        assert!(summary.contains("Coupon FLAT50"));
        assert!(summary.contains("+₹13.60"));
        assert!(summary.contains("₹413.60"));
    }

    #[test]
    fn test_summary_shows_minimum_when_below_threshold() {
        let summary = render_summary(&quote(&ConfigState::default(), &quote_args("200")).unwrap());
        assert!(summary.contains("min ₹300"));
        assert!(summary.contains("! Minimum order amount is ₹300"));
    }

    #[test]
    fn test_validate_reports_message() {
        let report = validate(
            &ConfigState::default(),
            &ValidateArgs {
                store: store_args("10", "300"),
                bill: "abc".to_string(),
            },
        )
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.message.as_deref(), Some("Invalid amount"));

        let report = validate(
            &ConfigState::default(),
            &ValidateArgs {
                store: store_args("10", "300"),
                bill: "500".to_string(),
            },
        )
        .unwrap();
        assert!(report.valid);
        assert_eq!(report.amount, Some(Money::from_rupees(500)));
    }

    #[test]
    fn test_pay_builds_uri_for_grand_total() {
        let args = PayArgs {
            quote: quote_args("500"),
            vpa: Some("chaipoint@okaxis".to_string()),
            payee_name: None,
            reference: Some("TXN1".to_string()),
        };
        let report = pay(&ConfigState::default(), &args).unwrap();
        assert_eq!(report.payable, Money::from_paise(46360));
        assert!(report.uri.starts_with("upi://pay?pa=chaipoint%40okaxis&pn=Chai+Point&am=463.60"));
        assert!(report.uri.ends_with("&tr=TXN1"));
    }

    #[test]
    fn test_pay_refuses_invalid_bill_and_missing_vpa() {
        let args = PayArgs {
            quote: quote_args("200"),
            vpa: Some("chaipoint@okaxis".to_string()),
            payee_name: None,
            reference: None,
        };
        let err = pay(&ConfigState::default(), &args).unwrap_err();
        assert_eq!(err.message, "Minimum order amount is ₹300");

        let args = PayArgs {
            quote: quote_args("500"),
            vpa: None,
            payee_name: None,
            reference: None,
        };
        assert!(pay(&ConfigState::default(), &args).is_err());
    }

    #[test]
    fn test_run_session_reports_each_line() {
        let store = store_args("10", "300").policy().unwrap();
        let state = SessionState::new(CheckoutSession::new(
            store,
            ConfigState::default().checkout_policy().unwrap(),
            Money::from_rupees(500),
        ));
        let input = concat!(
            "{\"event\":\"bill\",\"input\":\"500\"}\n",
            "\n",
            "not json\n",
            "{\"event\":\"coupon_rejected\",\"reason\":\"Coupon expired\"}\n",
            "{\"event\":\"coupon_applied\",\"discount\":\"50\",\"label\":\"FLAT50\"}\n",
        );

        let mut out = Vec::new();
        let summary = run_session(&state, input.as_bytes(), &mut out).unwrap();
        assert_eq!(summary, SessionSummary { events: 4, errors: 1 });

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["payable"], "463.60");
        assert_eq!(lines[1]["error"]["code"], "INVALID_INPUT");
        assert_eq!(lines[2]["state"]["coupon_error"], "Coupon expired");
        assert_eq!(lines[3]["payable"], "413.60");
        assert_eq!(lines[3]["state"]["coupon"]["status"], "applied");
    }

    #[test]
    fn test_run_session_survives_i64_scale_amounts() {
        let store = store_args("10", "300").policy().unwrap();
        let state = SessionState::new(CheckoutSession::new(
            store,
            ConfigState::default().checkout_policy().unwrap(),
            Money::zero(),
        ));
        let input = concat!(
            "{\"event\":\"bill\",\"input\":\"92233720368547758\"}\n",
            "{\"event\":\"bill\",\"input\":\"500\"}\n",
            "{\"event\":\"coupon_applied\",\"discount\":\"92233720368547758\",\"label\":\"HUGE\"}\n",
        );

        let mut out = Vec::new();
        let summary = run_session(&state, input.as_bytes(), &mut out).unwrap();
        assert_eq!(summary, SessionSummary { events: 3, errors: 0 });

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["state"]["bill_error"], "Amount cannot exceed ₹1,00,000");
        assert_eq!(lines[2]["payable"], "0.00");
    }
}
