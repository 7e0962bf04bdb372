//! # State Module
//!
//! Separate state types, each with one job:
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │      ConfigState         │   │      SessionState        │
//! │  tax, cap, ceiling, UPI  │   │  Mutex<CheckoutSession>  │
//! │  read-only after start   │   │  replaced per event      │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```

mod config;
mod session;

pub use config::ConfigState;
pub use session::{SessionEvent, SessionState, Transition};
