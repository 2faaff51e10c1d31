//! Donation rows and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wishdrop_core::donation::DonationStatus;
use wishdrop_core::error::CoreError;
use wishdrop_core::leaderboard::ContributionRecord;
use wishdrop_core::types::{Cents, DbId, Timestamp};

/// A row from the `donations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub wish_id: DbId,
    pub donor_id: Option<DbId>,
    pub amount: Cents,
    pub currency: String,
    pub status: String,
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Donation {
    pub fn status(&self) -> Result<DonationStatus, CoreError> {
        self.status.parse()
    }

    /// Copy for public display: anonymous donations hide the donor.
    pub fn public_view(&self) -> Donation {
        let mut view = self.clone();
        if view.is_anonymous {
            view.donor_id = None;
        }
        view
    }
}

/// Minimal projection used to build leaderboards.
#[derive(Debug, Clone, FromRow)]
pub struct ContributionRow {
    pub donor_id: DbId,
    pub amount: Cents,
    pub status: String,
}

impl ContributionRow {
    /// Convert into the aggregator's input. Rows with an unrecognised
    /// status are dropped.
    pub fn to_record(&self) -> Option<ContributionRecord> {
        let status = self.status.parse::<DonationStatus>().ok()?;
        Some(ContributionRecord {
            donor_id: self.donor_id,
            amount: self.amount,
            status,
        })
    }
}

/// DTO for recording a completed donation.
#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub wish_id: DbId,
    pub donor_id: DbId,
    pub amount: Cents,
    pub is_anonymous: bool,
    pub message: Option<String>,
}

/// Result of attempting to record a donation.
#[derive(Debug, Clone)]
pub enum DonationOutcome {
    Recorded {
        donation: Donation,
        karma_awarded: i64,
        /// `true` when this donation moved the wish from pending to funded.
        wish_funded: bool,
    },
    /// The wish is no longer accepting donations.
    WishClosed { status: String },
    WishNotFound,
}
