//! # Error Types
//!
//! Domain-specific error types for slash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  slash-core errors (this file)                                         │
//! │  ├── CoreError        - Rejected transitions (coupon, spin, UPI)       │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  slash-cli errors (app)                                                │
//! │  └── CliError         - What the terminal sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → stderr / JSON          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: every error leaves the caller holding a state it
//! can continue from.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by checkout and reward transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A coupon is already on the bill.
    ///
    /// ## User Workflow
    /// ```text
    /// Coupon "FLAT50" applied
    ///      │
    ///      ▼
    /// User submits "WELCOME100"
    ///      │
    ///      ▼
    /// CouponAlreadyApplied { label: "FLAT50" }
    ///      │
    ///      ▼
    /// UI keeps FLAT50; user must remove it first
    /// ```
    #[error("Coupon {label} is already applied; remove it first")]
    CouponAlreadyApplied { label: String },

    /// The spin campaign is switched off.
    #[error("Spin campaign {campaign} is not active")]
    CampaignInactive { campaign: String },

    /// No spins left for today.
    #[error("Daily spin limit of {limit} reached")]
    DailySpinLimitReached { limit: u32 },

    /// Campaign definition is unusable (no segments, zero weights).
    #[error("Invalid spin campaign: {reason}")]
    InvalidCampaign { reason: String },

    /// Payment link could not be built.
    #[error("Invalid payment link: {reason}")]
    InvalidPaymentLink { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The bill-amount variants render the exact strings shown under the amount
/// field, so their `Display` output is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text that does not parse as an amount.
    #[error("Invalid amount")]
    InvalidAmount,

    /// Zero or negative bill.
    #[error("Amount must be greater than 0")]
    AmountNotPositive,

    /// Bill below the store's minimum order.
    #[error("Minimum order amount is {}", .minimum.to_short_string())]
    BelowMinimumOrder { minimum: Money },

    /// Bill above the checkout ceiling.
    #[error("Amount cannot exceed {}", .maximum.to_short_string())]
    AboveMaximum { maximum: Money },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed VPA).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_amount_messages() {
        assert_eq!(ValidationError::InvalidAmount.to_string(), "Invalid amount");
        assert_eq!(
            ValidationError::AmountNotPositive.to_string(),
            "Amount must be greater than 0"
        );
        assert_eq!(
            ValidationError::BelowMinimumOrder {
                minimum: Money::from_rupees(300)
            }
            .to_string(),
            "Minimum order amount is ₹300"
        );
        assert_eq!(
            ValidationError::AboveMaximum {
                maximum: Money::from_rupees(100_000)
            }
            .to_string(),
            "Amount cannot exceed ₹1,00,000"
        );
    }

    #[test]
    fn test_core_error_messages() {
        let err = CoreError::CouponAlreadyApplied {
            label: "FLAT50".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Coupon FLAT50 is already applied; remove it first"
        );

        let err = CoreError::DailySpinLimitReached { limit: 1 };
        assert_eq!(err.to_string(), "Daily spin limit of 1 reached");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::InvalidAmount.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
