//! # Spin Wheel
//!
//! Daily rewards wheel: eligibility, weighted segment pick and the angle the
//! reveal animation must stop at.
//!
//! ## Spin Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tap "Spin"                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  check_eligibility ── inactive? ──► CampaignInactive                    │
//! │      │             └─ used up?  ──► DailySpinLimitReached               │
//! │      ▼                                                                  │
//! │  select_segment(roll)     roll comes from the caller (no RNG in here)  │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  target_angle ──► UI animates 5 full turns + offset, then reveals      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Geometry
//! Segments are laid out clockwise from the pointer at 12 o'clock, each
//! `360 / n` degrees wide. Rotating the wheel clockwise by
//! `turns × 360 + (360 − (i + ½) × width)` puts the centre of segment `i`
//! under the pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_coupon_code, validate_uuid};
use crate::{MIN_SPIN_SEGMENTS, SPIN_FULL_TURNS};

// =============================================================================
// Campaign Definition
// =============================================================================

/// What a segment pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinReward {
    /// Credited to the wallet.
    Cashback { amount: Money },
    /// Coupon code usable at checkout.
    Coupon { code: String },
    BetterLuckNextTime,
}

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinSegment {
    pub label: String,
    pub reward: SpinReward,
    /// Relative odds; a weight-2 slice lands twice as often as weight-1.
    pub weight: u32,
}

/// A wheel configured by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinCampaign {
    pub id: String,
    pub name: String,
    pub segments: Vec<SpinSegment>,
    /// Spins allowed per user per UTC day.
    pub daily_spins: u32,
    pub active: bool,
}

impl SpinCampaign {
    /// Checks the campaign can actually be played.
    ///
    /// ## Rules
    /// - `id` is a UUID
    /// - at least two segments, every weight > 0
    /// - cashback rewards positive, coupon codes well-formed
    /// - at least one spin per day
    pub fn validate(&self) -> CoreResult<()> {
        validate_uuid("campaign id", &self.id)?;

        if self.segments.len() < MIN_SPIN_SEGMENTS {
            return Err(CoreError::InvalidCampaign {
                reason: format!("needs at least {} segments", MIN_SPIN_SEGMENTS),
            });
        }

        if self.daily_spins == 0 {
            return Err(CoreError::InvalidCampaign {
                reason: "daily spins must be at least 1".to_string(),
            });
        }

        for segment in &self.segments {
            if segment.weight == 0 {
                return Err(CoreError::InvalidCampaign {
                    reason: format!("segment '{}' has zero weight", segment.label),
                });
            }
            match &segment.reward {
                SpinReward::Cashback { amount } if !amount.is_positive() => {
                    return Err(CoreError::InvalidCampaign {
                        reason: format!("segment '{}' pays a non-positive cashback", segment.label),
                    });
                }
                SpinReward::Coupon { code } => {
                    validate_coupon_code(code)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Sum of all segment weights.
    pub fn total_weight(&self) -> u64 {
        self.segments.iter().map(|s| s.weight as u64).sum()
    }

    /// Width of one segment in degrees.
    pub fn segment_width(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }
}

// =============================================================================
// Per-User History
// =============================================================================

/// How much a user has already played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinHistory {
    /// Spins on the day of `last_spin_at`.
    pub spins_today: u32,
    #[ts(as = "Option<String>")]
    pub last_spin_at: Option<DateTime<Utc>>,
}

impl SpinHistory {
    /// Spins already used on `now`'s UTC day.
    pub fn spins_on(&self, now: DateTime<Utc>) -> u32 {
        match self.last_spin_at {
            Some(last) if last.date_naive() == now.date_naive() => self.spins_today,
            _ => 0,
        }
    }

    fn record(&self, now: DateTime<Utc>) -> SpinHistory {
        SpinHistory {
            spins_today: self.spins_on(now) + 1,
            last_spin_at: Some(now),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Returns how many spins are left today.
///
/// ## Errors
/// - [`CoreError::CampaignInactive`]
/// - [`CoreError::DailySpinLimitReached`]
pub fn check_eligibility(
    campaign: &SpinCampaign,
    history: &SpinHistory,
    now: DateTime<Utc>,
) -> CoreResult<u32> {
    if !campaign.active {
        return Err(CoreError::CampaignInactive {
            campaign: campaign.name.clone(),
        });
    }

    let used = history.spins_on(now);
    if used >= campaign.daily_spins {
        return Err(CoreError::DailySpinLimitReached {
            limit: campaign.daily_spins,
        });
    }

    Ok(campaign.daily_spins - used)
}

/// Picks a segment index from a caller-supplied roll.
///
/// `roll % total_weight` is walked across cumulative weights, so any uniform
/// source of `u64` gives the configured odds.
pub fn select_segment(campaign: &SpinCampaign, roll: u64) -> CoreResult<usize> {
    let total = campaign.total_weight();
    if total == 0 {
        return Err(CoreError::InvalidCampaign {
            reason: "no weighted segments".to_string(),
        });
    }

    let mut point = roll % total;
    for (index, segment) in campaign.segments.iter().enumerate() {
        let weight = segment.weight as u64;
        if point < weight {
            return Ok(index);
        }
        point -= weight;
    }

    // Unreachable: point < total by construction.
    Err(CoreError::InvalidCampaign {
        reason: "roll fell outside the wheel".to_string(),
    })
}

/// Clockwise rotation in degrees that stops on the centre of `index`.
pub fn target_angle(campaign: &SpinCampaign, index: usize) -> f64 {
    let width = campaign.segment_width();
    let offset = 360.0 - (index as f64 + 0.5) * width;
    SPIN_FULL_TURNS as f64 * 360.0 + offset
}

/// Result of one spin, ready for the reveal animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinResult {
    pub segment_index: usize,
    pub label: String,
    pub reward: SpinReward,
    pub target_angle_degrees: f64,
    /// History to store for the next eligibility check.
    pub history: SpinHistory,
    pub spins_left: u32,
}

/// Plays one spin.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use slash_core::money::Money;
/// use slash_core::spin::{spin, SpinCampaign, SpinHistory, SpinReward, SpinSegment};
///
/// let campaign = SpinCampaign {
///     id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
///     name: "Daily Spin".to_string(),
///     segments: vec![
///         SpinSegment { label: "₹10".into(), reward: SpinReward::Cashback { amount: Money::from_rupees(10) }, weight: 1 },
///         SpinSegment { label: "Try again".into(), reward: SpinReward::BetterLuckNextTime, weight: 3 },
///     ],
///     daily_spins: 1,
///     active: true,
/// };
///
/// let result = spin(&campaign, &SpinHistory::default(), 0, Utc::now()).unwrap();
/// assert_eq!(result.segment_index, 0);
/// assert_eq!(result.spins_left, 0);
/// ```
pub fn spin(
    campaign: &SpinCampaign,
    history: &SpinHistory,
    roll: u64,
    now: DateTime<Utc>,
) -> CoreResult<SpinResult> {
    campaign.validate()?;
    let remaining = check_eligibility(campaign, history, now)?;

    let segment_index = select_segment(campaign, roll)?;
    let segment = &campaign.segments[segment_index];

    Ok(SpinResult {
        segment_index,
        label: segment.label.clone(),
        reward: segment.reward.clone(),
        target_angle_degrees: target_angle(campaign, segment_index),
        history: history.record(now),
        spins_left: remaining - 1,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
