//! Karma tiers.
//!
//! Maps a karma score onto a named tier and reports how far the profile
//! is from the next one. Thresholds are inclusive lower bounds.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Tier table
// ---------------------------------------------------------------------------

/// Named karma bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum KarmaTier {
    Beginner,
    Contributor,
    Advanced,
    Expert,
    Master,
    Legend,
}

/// `(tier, minimum karma)` ordered from highest to lowest.
pub const TIER_THRESHOLDS: [(KarmaTier, i64); 6] = [
    (KarmaTier::Legend, 10_000),
    (KarmaTier::Master, 5_000),
    (KarmaTier::Expert, 1_000),
    (KarmaTier::Advanced, 500),
    (KarmaTier::Contributor, 100),
    (KarmaTier::Beginner, 0),
];

/// Karma at which the top tier is reached.
pub const MAX_TIER_KARMA: i64 = 10_000;

impl KarmaTier {
    pub fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Contributor => "Contributor",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Master => "Master",
            Self::Legend => "Legend",
        }
    }

    /// Inclusive lower bound of this tier.
    pub fn min_karma(self) -> i64 {
        TIER_THRESHOLDS
            .iter()
            .find(|(tier, _)| *tier == self)
            .map(|(_, min)| *min)
            .unwrap_or(0)
    }
}

impl fmt::Display for KarmaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The next threshold a profile is working toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextThreshold {
    Tier { tier: KarmaTier, karma: i64 },
    MaxLevelReached,
}

fn validate_karma(karma: i64) -> Result<(), CoreError> {
    if karma < 0 {
        return Err(CoreError::Validation(format!(
            "Karma must not be negative, got {karma}"
        )));
    }
    Ok(())
}

/// Classify a karma score. The first threshold (highest first) that the
/// score meets wins.
pub fn tier_for(karma: i64) -> Result<KarmaTier, CoreError> {
    validate_karma(karma)?;
    Ok(TIER_THRESHOLDS
        .iter()
        .find(|(_, min)| karma >= *min)
        .map(|(tier, _)| *tier)
        .unwrap_or(KarmaTier::Beginner))
}

/// Smallest threshold strictly greater than `karma`.
pub fn next_threshold(karma: i64) -> Result<NextThreshold, CoreError> {
    validate_karma(karma)?;
    Ok(TIER_THRESHOLDS
        .iter()
        .rev()
        .find(|(_, min)| *min > karma)
        .map(|&(tier, min)| NextThreshold::Tier { tier, karma: min })
        .unwrap_or(NextThreshold::MaxLevelReached))
}

/// `karma / next_threshold` as a fraction in `[0, 1]`; `1.0` at max level.
pub fn progress_to_next_tier(karma: i64) -> Result<f64, CoreError> {
    match next_threshold(karma)? {
        NextThreshold::Tier { karma: target, .. } => Ok((karma as f64 / target as f64).min(1.0)),
        NextThreshold::MaxLevelReached => Ok(1.0),
    }
}

/// Everything a karma card displays for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KarmaSummary {
    pub karma: i64,
    pub tier: KarmaTier,
    pub next: NextThreshold,
    pub progress_to_next: f64,
}

pub fn summarize(karma: i64) -> Result<KarmaSummary, CoreError> {
    Ok(KarmaSummary {
        karma,
        tier: tier_for(karma)?,
        next: next_threshold(karma)?,
        progress_to_next: progress_to_next_tier(karma)?,
    })
}
