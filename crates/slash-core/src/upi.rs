//! # UPI Payment Links
//!
//! Builds the `upi://pay` intent URI that hands the grand total to the
//! user's UPI app.
//!
//! ```text
//! upi://pay?pa=store%40okaxis&pn=Chai+Point&am=463.60&cu=INR&tn=Slash+bill&tr=TXN42
//!           │                 │             │         │      │             │
//!           payee VPA         payee name    amount    INR    note          reference
//! ```

use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_upi_vpa;

/// Currency code sent with every intent.
const UPI_CURRENCY: &str = "INR";

/// Parameters of one payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiPayment<'a> {
    pub payee_vpa: &'a str,
    pub payee_name: &'a str,
    pub amount: Money,
    pub note: Option<&'a str>,
    pub transaction_ref: Option<&'a str>,
}

/// Builds the intent URI.
///
/// ## Errors
/// - [`CoreError::Validation`] for a malformed VPA
/// - [`CoreError::InvalidPaymentLink`] for a non-positive amount or empty payee
///
/// ```rust
/// use slash_core::money::Money;
/// use slash_core::upi::{upi_payment_uri, UpiPayment};
///
/// let uri = upi_payment_uri(&UpiPayment {
///     payee_vpa: "chaipoint@okaxis",
///     payee_name: "Chai Point",
///     amount: Money::from_paise(46360),
///     note: None,
///     transaction_ref: None,
/// })
/// .unwrap();
/// assert_eq!(uri, "upi://pay?pa=chaipoint%40okaxis&pn=Chai+Point&am=463.60&cu=INR");
/// ```
pub fn upi_payment_uri(payment: &UpiPayment<'_>) -> CoreResult<String> {
    validate_upi_vpa(payment.payee_vpa)?;

    if payment.payee_name.trim().is_empty() {
        return Err(CoreError::InvalidPaymentLink {
            reason: "payee name is required".to_string(),
        });
    }

    if !payment.amount.is_positive() {
        return Err(CoreError::InvalidPaymentLink {
            reason: format!("amount must be positive, got {}", payment.amount),
        });
    }

    let amount = payment.amount.to_decimal_string();
    let mut params = vec![
        ("pa", payment.payee_vpa.trim()),
        ("pn", payment.payee_name.trim()),
        ("am", amount.as_str()),
        ("cu", UPI_CURRENCY),
    ];
    if let Some(note) = payment.note.filter(|n| !n.trim().is_empty()) {
        params.push(("tn", note));
    }
    if let Some(reference) = payment.transaction_ref.filter(|r| !r.trim().is_empty()) {
        params.push(("tr", reference));
    }

    let url = Url::parse_with_params("upi://pay", &params).map_err(|e| CoreError::InvalidPaymentLink {
        reason: e.to_string(),
    })?;

    Ok(url.into())
}
