//! # Command Handlers
//!
//! One module per screen. Handlers take parsed arguments plus config and
//! return values; printing happens in `lib.rs`.

pub mod checkout;
pub mod spin;

pub use checkout::{PayArgs, QuoteArgs, SessionArgs, ValidateArgs};
pub use spin::SpinArgs;
