//! # Validation Module
//!
//! Input validation for the pay screen and the policies that feed it.
//!
//! ## Field Errors, Not Failures
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Keypad text ──► validate_bill_amount() ──► message under the field     │
//! │       │                                                                 │
//! │       └────────► Money::parse (or 0) ──► recalculate() keeps running    │
//! │                                                                         │
//! │  A bad bill never blocks cashback or coupon fields from updating.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CheckoutPolicy, StorePricingPolicy};
use crate::MAX_COUPON_CODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Bill Amount
// =============================================================================

/// Outcome of checking the bill-amount field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillAmountValidation {
    /// Field not touched yet; show nothing.
    Empty,
    /// Amount is payable.
    Valid(Money),
    /// Show the error under the field.
    Invalid(ValidationError),
}

impl BillAmountValidation {
    /// Message to render under the field, if any.
    pub fn error_message(&self) -> Option<String> {
        match self {
            BillAmountValidation::Invalid(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, BillAmountValidation::Valid(_))
    }
}

/// Validates the bill amount typed on the pay screen.
///
/// ## Rules (checked in order)
/// ```text
/// ""/whitespace        → Empty (no message)
/// not a number         → "Invalid amount"
/// ≤ 0                  → "Amount must be greater than 0"
/// < minimum order (>0) → "Minimum order amount is ₹300"
/// > ceiling            → "Amount cannot exceed ₹1,00,000"
/// otherwise            → Valid(amount)
/// ```
///
/// ## Example
/// ```rust
/// use slash_core::money::Money;
/// use slash_core::types::{CheckoutPolicy, Rate, StorePricingPolicy};
/// use slash_core::validation::{validate_bill_amount, BillAmountValidation};
///
/// let store = StorePricingPolicy::new("s1", "Cafe", Rate::from_bps(1000), Money::from_rupees(300)).unwrap();
/// let policy = CheckoutPolicy::default();
///
/// assert_eq!(validate_bill_amount("", &store, &policy), BillAmountValidation::Empty);
/// assert_eq!(
///     validate_bill_amount("abc", &store, &policy).error_message().as_deref(),
///     Some("Invalid amount")
/// );
/// assert!(validate_bill_amount("500", &store, &policy).is_valid());
/// ```
pub fn validate_bill_amount(
    input: &str,
    store: &StorePricingPolicy,
    policy: &CheckoutPolicy,
) -> BillAmountValidation {
    if input.trim().is_empty() {
        return BillAmountValidation::Empty;
    }

    let amount = match Money::parse(input) {
        Ok(amount) => amount,
        Err(err) => return BillAmountValidation::Invalid(err),
    };

    if !amount.is_positive() {
        return BillAmountValidation::Invalid(ValidationError::AmountNotPositive);
    }

    let minimum = store.minimum_order_amount;
    if minimum.is_positive() && amount < minimum {
        return BillAmountValidation::Invalid(ValidationError::BelowMinimumOrder { minimum });
    }

    if amount > policy.max_bill_amount {
        return BillAmountValidation::Invalid(ValidationError::AboveMaximum {
            maximum: policy.max_bill_amount,
        });
    }

    BillAmountValidation::Valid(amount)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates that an amount is zero or more.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Letters and digits only
///
/// ## Returns
/// The trimmed, upper-cased code.
///
/// ```rust
/// use slash_core::validation::validate_coupon_code;
///
/// assert_eq!(validate_coupon_code(" flat50 ").unwrap(), "FLAT50");
/// assert!(validate_coupon_code("FLAT 50").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.chars().count() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates a UUID string (campaign ids).
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<uuid::Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

/// Validates a UPI virtual payment address (`name@bank`).
pub fn validate_upi_vpa(vpa: &str) -> ValidationResult<()> {
    let vpa = vpa.trim();

    if vpa.is_empty() {
        return Err(ValidationError::Required {
            field: "UPI id".to_string(),
        });
    }

    let well_formed = match vpa.split_once('@') {
        Some((handle, bank)) => {
            !handle.is_empty()
                && !bank.is_empty()
                && !bank.contains('@')
                && vpa
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '@'))
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "UPI id".to_string(),
            reason: "must look like name@bank".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rate;

    fn store(minimum_rupees: i64) -> StorePricingPolicy {
        StorePricingPolicy::new(
            "store-1",
            "Chai Point",
            Rate::from_bps(1000),
            Money::from_rupees(minimum_rupees),
        )
        .unwrap()
    }

    fn message(input: &str, minimum_rupees: i64) -> Option<String> {
        validate_bill_amount(input, &store(minimum_rupees), &CheckoutPolicy::default())
            .error_message()
    }

    #[test]
    fn test_empty_input_shows_nothing() {
        let policy = CheckoutPolicy::default();
        assert_eq!(validate_bill_amount("", &store(300), &policy), BillAmountValidation::Empty);
        assert_eq!(validate_bill_amount("  ", &store(300), &policy), BillAmountValidation::Empty);
    }

    #[test]
    fn test_bill_amount_messages() {
        assert_eq!(message("abc", 300).as_deref(), Some("Invalid amount"));
        assert_eq!(message("0", 300).as_deref(), Some("Amount must be greater than 0"));
        assert_eq!(message("-20", 300).as_deref(), Some("Amount must be greater than 0"));
        assert_eq!(message("200", 300).as_deref(), Some("Minimum order amount is ₹300"));
        assert_eq!(message("100000.01", 0).as_deref(), Some("Amount cannot exceed ₹1,00,000"));
        assert_eq!(message("500", 300), None);
    }

    #[test]
    fn test_minimum_boundary_is_inclusive() {
        assert_eq!(message("300", 300), None);
        assert_eq!(message("299.99", 300).as_deref(), Some("Minimum order amount is ₹300"));
    }

    #[test]
    fn test_zero_minimum_never_blocks() {
        assert_eq!(message("0.01", 0), None);
    }

    #[test]
    fn test_ceiling_is_inclusive_and_configurable() {
        assert_eq!(message("100000", 0), None);

        let policy = CheckoutPolicy::new(
            Rate::from_bps(272),
            Rate::from_bps(2000),
            Money::from_rupees(50_000),
        )
        .unwrap();
        assert_eq!(
            validate_bill_amount("60000", &store(0), &policy).error_message().as_deref(),
            Some("Amount cannot exceed ₹50,000")
        );
    }

    #[test]
    fn test_valid_carries_amount() {
        assert_eq!(
            validate_bill_amount("500.50", &store(300), &CheckoutPolicy::default()),
            BillAmountValidation::Valid(Money::from_paise(50_050))
        );
    }

    #[test]
    fn test_validate_coupon_code() {
        assert_eq!(validate_coupon_code("welcome100").unwrap(), "WELCOME100");
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("FLAT-50").is_err());
        assert!(validate_coupon_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("campaign id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("campaign id", "").is_err());
        assert!(validate_uuid("campaign id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_upi_vpa() {
        assert!(validate_upi_vpa("chaipoint@okaxis").is_ok());
        assert!(validate_upi_vpa("store.42@ybl").is_ok());
        assert!(validate_upi_vpa("").is_err());
        assert!(validate_upi_vpa("no-at-sign").is_err());
        assert!(validate_upi_vpa("@bank").is_err());
        assert!(validate_upi_vpa("a@b@c").is_err());
        assert!(validate_upi_vpa("has space@bank").is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps("tax", 0).is_ok());
        assert!(validate_rate_bps("tax", 10000).is_ok());
        assert!(validate_rate_bps("tax", 10001).is_err());
    }
}
