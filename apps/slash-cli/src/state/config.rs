//! # Configuration State
//!
//! Checkout constants and payee details loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--tax-rate`, …)
//! 2. Environment variables (`SLASH_*`)
//! 3. Defaults (the platform's published policy)
//!
//! Read-only after initialization, so no mutex needed.

use serde::Serialize;
use slash_core::{CheckoutPolicy, Money, Rate};
use tracing::warn;

use crate::error::CliError;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Surcharge on the bill (default 2.72%)
    pub tax_rate: Rate,

    /// Share of the bill payable with cashback (default 20%)
    pub cashback_cap: Rate,

    /// Checkout ceiling (default ₹1,00,000)
    pub max_bill_amount: Money,

    /// Payee VPA for UPI intents
    pub upi_vpa: Option<String>,

    /// Payee display name for UPI intents
    pub upi_payee_name: Option<String>,
}

impl Default for ConfigState {
    fn default() -> Self {
        let policy = CheckoutPolicy::default();
        ConfigState {
            tax_rate: policy.tax_rate,
            cashback_cap: policy.cashback_cap_rate,
            max_bill_amount: policy.max_bill_amount,
            upi_vpa: None,
            upi_payee_name: None,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SLASH_TAX_RATE`: percentage, e.g. `"2.72"`
    /// - `SLASH_CASHBACK_CAP`: percentage, e.g. `"20"`
    /// - `SLASH_MAX_BILL`: rupees, e.g. `"100000"`
    /// - `SLASH_UPI_VPA`, `SLASH_UPI_NAME`: payee for `pay`
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(raw) = lookup("SLASH_TAX_RATE") {
            match Rate::parse_percent("SLASH_TAX_RATE", &raw) {
                Ok(rate) => config.tax_rate = rate,
                Err(e) => warn!(value = %raw, "Ignoring SLASH_TAX_RATE: {}", e),
            }
        }

        if let Some(raw) = lookup("SLASH_CASHBACK_CAP") {
            match Rate::parse_percent("SLASH_CASHBACK_CAP", &raw) {
                Ok(rate) => config.cashback_cap = rate,
                Err(e) => warn!(value = %raw, "Ignoring SLASH_CASHBACK_CAP: {}", e),
            }
        }

        if let Some(raw) = lookup("SLASH_MAX_BILL") {
            match Money::parse(&raw) {
                Ok(amount) if amount.is_positive() => config.max_bill_amount = amount,
                _ => warn!(value = %raw, "Ignoring SLASH_MAX_BILL: not a positive amount"),
            }
        }

        config.upi_vpa = lookup("SLASH_UPI_VPA").filter(|v| !v.trim().is_empty());
        config.upi_payee_name = lookup("SLASH_UPI_NAME").filter(|v| !v.trim().is_empty());

        config
    }

    /// Validated checkout policy for the core.
    pub fn checkout_policy(&self) -> Result<CheckoutPolicy, CliError> {
        Ok(CheckoutPolicy::new(
            self.tax_rate,
            self.cashback_cap,
            self.max_bill_amount,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_platform_policy() {
        let config = ConfigState::from_lookup(lookup(&[]));
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.checkout_policy().unwrap(), CheckoutPolicy::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("SLASH_TAX_RATE", "5"),
            ("SLASH_CASHBACK_CAP", "12.5"),
            ("SLASH_MAX_BILL", "50000"),
            ("SLASH_UPI_VPA", "store@okaxis"),
        ]));
        assert_eq!(config.tax_rate.bps(), 500);
        assert_eq!(config.cashback_cap.bps(), 1250);
        assert_eq!(config.max_bill_amount, Money::from_rupees(50_000));
        assert_eq!(config.upi_vpa.as_deref(), Some("store@okaxis"));
        assert_eq!(config.upi_payee_name, None);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("SLASH_TAX_RATE", "lots"),
            ("SLASH_CASHBACK_CAP", "150"),
            ("SLASH_MAX_BILL", "0"),
            ("SLASH_UPI_VPA", "  "),
        ]));
        assert_eq!(config, ConfigState::default());
    }
}
