//! # Spin Command
//!
//! Plays one spin of a campaign wheel and prints the result as JSON.
//!
//! The roll comes from `rand` unless `--roll` pins it; the core only sees a
//! number, so results are reproducible in scripts.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use rand::Rng;
use slash_core::spin::{spin, SpinCampaign, SpinHistory, SpinResult, SpinReward, SpinSegment};
use slash_core::Money;
use tracing::{debug, info};

use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct SpinArgs {
    #[arg(long, help = "Campaign JSON file (built-in daily wheel if omitted)")]
    pub campaign: Option<PathBuf>,

    #[arg(long, default_value_t = 0, help = "Spins already used on the last spin day")]
    pub spins_today: u32,

    #[arg(long, help = "Time of the last spin, RFC 3339")]
    pub last_spin: Option<DateTime<Utc>>,

    #[arg(long, help = "Fixed roll instead of a random one")]
    pub roll: Option<u64>,
}

/// Built-in wheel used when no campaign file is given.
pub fn default_campaign() -> SpinCampaign {
    let segment = |label: &str, reward: SpinReward, weight: u32| SpinSegment {
        label: label.to_string(),
        reward,
        weight,
    };

    SpinCampaign {
        id: "7d3f2c9a-4b1e-4f6a-9c2d-1a8e5b7c3f10".to_string(),
        name: "Daily Spin".to_string(),
        segments: vec![
            segment("₹10 cashback", SpinReward::Cashback { amount: Money::from_rupees(10) }, 4),
            segment("Try again", SpinReward::BetterLuckNextTime, 6),
            segment("₹25 cashback", SpinReward::Cashback { amount: Money::from_rupees(25) }, 2),
            segment("FLAT50", SpinReward::Coupon { code: "FLAT50".to_string() }, 2),
            segment("₹100 cashback", SpinReward::Cashback { amount: Money::from_rupees(100) }, 1),
            segment("Try again", SpinReward::BetterLuckNextTime, 5),
        ],
        daily_spins: 1,
        active: true,
    }
}

pub fn load_campaign(path: Option<&PathBuf>) -> Result<SpinCampaign, CliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading campaign");
            let raw = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(default_campaign()),
    }
}

pub fn run_spin(args: &SpinArgs, now: DateTime<Utc>) -> Result<SpinResult, CliError> {
    let campaign = load_campaign(args.campaign.as_ref())?;
    let history = SpinHistory {
        spins_today: args.spins_today,
        last_spin_at: args.last_spin,
    };
    let roll = args.roll.unwrap_or_else(|| rand::thread_rng().gen());

    let result = spin(&campaign, &history, roll, now)?;
    info!(
        campaign = %campaign.name,
        segment = result.segment_index,
        spins_left = result.spins_left,
        "Spin played"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::TimeZone;

    fn args(roll: Option<u64>) -> SpinArgs {
        SpinArgs {
            campaign: None,
            spins_today: 0,
            last_spin: None,
            roll,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_campaign_is_playable() {
        assert!(default_campaign().validate().is_ok());
    }

    #[test]
    fn test_fixed_roll_is_reproducible() {
        // Weights 4,6,2,2,1,5: roll 10 lands in the third slice.
        let result = run_spin(&args(Some(10)), noon()).unwrap();
        assert_eq!(result.segment_index, 2);
        assert_eq!(result.label, "₹25 cashback");
        assert_eq!(result.spins_left, 0);
        assert_eq!(result.history.spins_today, 1);
    }

    #[test]
    fn test_random_roll_stays_on_wheel() {
        let result = run_spin(&args(None), noon()).unwrap();
        assert!(result.segment_index < default_campaign().segments.len());
    }

    #[test]
    fn test_limit_resets_next_day() {
        let mut spent = args(Some(0));
        spent.spins_today = 1;
        spent.last_spin = Some(Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap());
        let err = run_spin(&spent, noon()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SpinError);

        spent.last_spin = Some(Utc.with_ymd_and_hms(2026, 10, 17, 23, 0, 0).unwrap());
        assert!(run_spin(&spent, noon()).is_ok());
    }

    #[test]
    fn test_missing_campaign_file() {
        let mut missing = args(Some(0));
        missing.campaign = Some(PathBuf::from("/nonexistent/slash-campaign.json"));
        let err = run_spin(&missing, noon()).unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
    }
}
