//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function ── Result<T, CliError>                                │
//! │         │                                                               │
//! │         ├── ValidationError ──► VALIDATION_ERROR                        │
//! │         ├── CouponAlreadyApplied ──► COUPON_ERROR                       │
//! │         ├── Spin limits ──► SPIN_ERROR                                  │
//! │         ├── Bad JSON event ──► INVALID_INPUT                            │
//! │         └── stdin/stdout/file ──► IO_ERROR                              │
//! │                                                                         │
//! │  `session` prints errors as JSON lines and keeps going;                 │
//! │  one-shot commands print them to stderr and exit non-zero.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use slash_core::{CoreError, ValidationError};

/// Error surfaced to the terminal.
///
/// ```json
/// { "code": "COUPON_ERROR", "message": "Coupon FLAT50 is already applied; remove it first" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Coupon lifecycle rule broken
    CouponError,

    /// Spin campaign or eligibility problem
    SpinError,

    /// Payment link could not be built
    PaymentError,

    /// Malformed event or argument
    InvalidInput,

    /// Reading or writing failed
    IoError,
}

impl ErrorCode {
    /// Wire spelling, identical to the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::CouponError => "COUPON_ERROR",
            ErrorCode::SpinError => "SPIN_ERROR",
            ErrorCode::PaymentError => "PAYMENT_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::IoError => "IO_ERROR",
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CouponAlreadyApplied { .. } => {
                CliError::new(ErrorCode::CouponError, err.to_string())
            }
            CoreError::CampaignInactive { .. }
            | CoreError::DailySpinLimitReached { .. }
            | CoreError::InvalidCampaign { .. } => CliError::new(ErrorCode::SpinError, err.to_string()),
            CoreError::InvalidPaymentLink { .. } => {
                CliError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(e) => CliError::from(e),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            tracing::error!("JSON I/O failed: {}", err);
            CliError::new(ErrorCode::IoError, err.to_string())
        } else {
            CliError::invalid_input(format!("Malformed JSON: {}", err))
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O failed: {}", err);
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}
