//! Funding progress for a wish.
//!
//! Only completed donations are fed in. Concurrent donations may carry a
//! wish past its goal before the status flips to funded; the raw total is
//! reported as-is and only the display percentage is clamped.

use serde::Serialize;

use crate::donation::validate_donation_amount;
use crate::error::CoreError;
use crate::types::{Cents, DbId};
use crate::wish::validate_goal_amount;

/// Upper bound of the display percentage.
pub const MAX_PROGRESS_PERCENTAGE: f64 = 100.0;

/// Observable funding state of a single wish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingProgress {
    pub goal_amount: Cents,
    /// Sum of completed donations. Never clamped.
    pub total_donated: Cents,
    /// `min(100, total / goal * 100)`.
    pub progress_percentage: f64,
    pub is_fully_funded: bool,
}

impl FundingProgress {
    /// Amount still needed to reach the goal, zero once funded.
    pub fn remaining(&self) -> Cents {
        (self.goal_amount - self.total_donated).max(0)
    }
}

/// Compute funding progress from a goal and completed donation amounts.
///
/// Fails with [`CoreError::Validation`] when the goal or any amount is not
/// strictly positive.
pub fn compute_progress<I>(goal_amount: Cents, completed_amounts: I) -> Result<FundingProgress, CoreError>
where
    I: IntoIterator<Item = Cents>,
{
    validate_goal_amount(goal_amount)?;

    let mut total_donated: Cents = 0;
    for amount in completed_amounts {
        validate_donation_amount(amount)?;
        total_donated = total_donated.checked_add(amount).ok_or_else(|| {
            CoreError::Validation("Donation total overflows the supported range".into())
        })?;
    }

    let raw = total_donated as f64 / goal_amount as f64 * 100.0;
    Ok(FundingProgress {
        goal_amount,
        total_donated,
        progress_percentage: raw.min(MAX_PROGRESS_PERCENTAGE),
        is_fully_funded: total_donated >= goal_amount,
    })
}

/// A wish's goal together with its completed donation amounts.
#[derive(Debug, Clone)]
pub struct WishFunding {
    pub wish_id: DbId,
    pub goal_amount: Cents,
    pub completed_amounts: Vec<Cents>,
}

/// Look up a wish in an already-fetched collection and compute its progress.
pub fn progress_for_wish(wishes: &[WishFunding], wish_id: DbId) -> Result<FundingProgress, CoreError> {
    let wish = wishes
        .iter()
        .find(|w| w.wish_id == wish_id)
        .ok_or(CoreError::NotFound {
            entity: "Wish",
            id: wish_id,
        })?;
    compute_progress(wish.goal_amount, wish.completed_amounts.iter().copied())
}
