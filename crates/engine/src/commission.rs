//! Commission split between the business and the attributed trainer.
//!
//! Every sale is attributed to a [`LeadSource`] which selects a fixed rate
//! pair. A loyalty bump moves [`LOYALTY_BUMP_BPS`] from the business rate to
//! the trainer rate. Rates are expressed in basis points and always sum to
//! [`BPS_SCALE`].

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, money::BPS_SCALE};

/// Shift applied in the trainer's favour when the loyalty bump holds.
pub const LOYALTY_BUMP_BPS: i64 = 500;

/// Who brought the sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Platform,
    TrainerBrought,
    Resign,
}

impl LeadSource {
    pub const ALL: [LeadSource; 3] = [Self::Platform, Self::TrainerBrought, Self::Resign];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::TrainerBrought => "trainer_brought",
            Self::Resign => "resign",
        }
    }

    /// `(business_bps, trainer_bps)` before any loyalty bump.
    pub const fn base_rates(self) -> (i64, i64) {
        match self {
            Self::Platform => (5_500, 4_500),
            Self::TrainerBrought => (2_000, 8_000),
            Self::Resign => (5_000, 5_000),
        }
    }
}

impl TryFrom<&str> for LeadSource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "platform" => Ok(Self::Platform),
            "trainer_brought" => Ok(Self::TrainerBrought),
            "resign" => Ok(Self::Resign),
            other => Err(EngineError::field(
                "leadSource",
                format!("unknown lead source '{other}' (expected platform, trainer_brought or resign)"),
            )),
        }
    }
}

/// Thresholds of the loyalty bump eligibility rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyPolicy {
    pub min_prior_sessions: i64,
    pub min_sessions_granted: i64,
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        Self {
            min_prior_sessions: 24,
            min_sessions_granted: 10,
        }
    }
}

impl LoyaltyPolicy {
    /// Pure function of the client's completed-session history and the size
    /// of the current grant.
    #[must_use]
    pub fn is_eligible(&self, prior_completed_sessions: i64, sessions_granted: i64) -> bool {
        prior_completed_sessions >= self.min_prior_sessions
            && sessions_granted >= self.min_sessions_granted
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub business_cut: MoneyCents,
    pub trainer_cut: MoneyCents,
    pub business_rate_bps: i64,
    pub trainer_rate_bps: i64,
    pub loyalty_bump: bool,
}

/// Splits `gross` between business and trainer.
///
/// The trainer cut is truncated to the cent and the business receives the
/// remainder, so `business_cut + trainer_cut == gross` always holds.
pub fn compute_split(
    lead_source: LeadSource,
    gross: MoneyCents,
    sessions_granted: i64,
    loyalty_bump_eligible: bool,
) -> ResultEngine<CommissionSplit> {
    if gross.cents() < 0 {
        return Err(EngineError::InvalidAmount(
            "gross amount must be >= 0".to_string(),
        ));
    }
    if sessions_granted <= 0 {
        return Err(EngineError::InvalidAmount(
            "sessions granted must be > 0".to_string(),
        ));
    }

    let (mut business_rate_bps, mut trainer_rate_bps) = lead_source.base_rates();
    let loyalty_bump = loyalty_bump_eligible && business_rate_bps >= LOYALTY_BUMP_BPS;
    if loyalty_bump {
        business_rate_bps -= LOYALTY_BUMP_BPS;
        trainer_rate_bps += LOYALTY_BUMP_BPS;
    }
    debug_assert_eq!(business_rate_bps + trainer_rate_bps, BPS_SCALE);

    let trainer_cut = gross.portion_floor(trainer_rate_bps);
    let business_cut = gross - trainer_cut;

    Ok(CommissionSplit {
        business_cut,
        trainer_cut,
        business_rate_bps,
        trainer_rate_bps,
        loyalty_bump,
    })
}

/// Split used when no trainer is attributed: the business keeps everything.
#[must_use]
pub fn business_only(gross: MoneyCents) -> CommissionSplit {
    CommissionSplit {
        business_cut: gross,
        trainer_cut: MoneyCents::ZERO,
        business_rate_bps: BPS_SCALE,
        trainer_rate_bps: 0,
        loyalty_bump: false,
    }
}
