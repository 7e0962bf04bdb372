//! # slash-core: Pure Checkout Logic for Slash
//!
//! The pay-screen arithmetic and reward rules of the Slash cashback app as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slash Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Mobile UI / slash-cli (enclosing caller)            │   │
//! │  │    Scan QR ──► Enter bill ──► Cashback / Coupon ──► Pay (UPI)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ values in, values out                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ slash-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐  │   │
//! │  │  │  money  │ │ checkout │ │ session │ │  spin  │ │   upi    │  │   │
//! │  │  │  Money  │ │ totals   │ │ value   │ │ wheel  │ │  links   │  │   │
//! │  │  │  Rate   │ │ clamps   │ │ changes │ │ odds   │ │          │  │   │
//! │  │  └─────────┘ └──────────┘ └─────────┘ └────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • NO RNG • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │       coupon service, wallet, store details: external collaborators    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer paise, parsed once from text
//! - [`types`] - Rates, store and checkout policies, coupon state
//! - [`checkout`] - The totals calculator and its state transitions
//! - [`session`] - Immutable checkout session with derived totals
//! - [`validation`] - Field rules and their user-facing messages
//! - [`spin`] - Daily spin-wheel rules
//! - [`upi`] - UPI payment intent URIs
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use slash_core::{CheckoutPolicy, CheckoutSession, Money, Rate, StorePricingPolicy};
//!
//! let store = StorePricingPolicy::new("s1", "Chai Point", Rate::from_bps(1000), Money::from_rupees(300)).unwrap();
//! let session = CheckoutSession::new(store, CheckoutPolicy::default(), Money::zero())
//!     .enter_bill("500");
//!
//! // 500 + 2.72% tax − 10% store discount
//! assert_eq!(session.payable().to_string(), "₹463.60");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod session;
pub mod spin;
pub mod types;
pub mod upi;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{CheckoutState, CheckoutTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::CheckoutSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default surcharge on the bill: 2.72%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 272;

/// Default share of the bill payable with cashback: 20%.
pub const DEFAULT_CASHBACK_CAP_BPS: u32 = 2000;

/// Default checkout ceiling: ₹1,00,000.
pub const DEFAULT_MAX_BILL_AMOUNT: Money = Money::from_rupees(100_000);

/// Longest coupon code the backend issues.
pub const MAX_COUPON_CODE_LEN: usize = 20;

/// Fewest segments a wheel can have.
pub const MIN_SPIN_SEGMENTS: usize = 2;

/// Full rotations before the wheel settles on the result.
pub const SPIN_FULL_TURNS: u32 = 5;
