//! Repository for the `donations` table.

use sqlx::PgPool;
use wishdrop_core::donation::karma_for_donation;
use wishdrop_core::types::{Cents, DbId};
use wishdrop_core::wish::WishStatus;

use crate::models::donation::{ContributionRow, CreateDonation, Donation, DonationOutcome};
use crate::repositories::{ProfileRepo, WishRepo};

/// Column list for `donations` queries.
const COLUMNS: &str = "id, wish_id, donor_id, amount, currency, status, is_anonymous, message, \
                       created_at, updated_at";

/// Provides CRUD operations for donations.
pub struct DonationRepo;

impl DonationRepo {
    /// Record a completed donation.
    ///
    /// Runs in one transaction: the wish row is locked, a wish past its
    /// deadline is refused, the donation is inserted, the donor's karma is
    /// incremented and the wish is flipped to funded if this donation
    /// reached its goal. Concurrent donations
    /// to the same wish serialize on the row lock, so exactly one of them
    /// observes the funded transition.
    pub async fn create_completed(
        pool: &PgPool,
        input: &CreateDonation,
    ) -> Result<DonationOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, (String, bool)>(
            "SELECT status, COALESCE(expires_at < now(), false) FROM wishes \
             WHERE id = $1 FOR UPDATE",
        )
        .bind(input.wish_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((status, overdue)) = row else {
            return Ok(DonationOutcome::WishNotFound);
        };
        if status != WishStatus::Pending.as_str() {
            return Ok(DonationOutcome::WishClosed { status });
        }
        if overdue {
            // Past its deadline but not swept yet. The sweep owns the write
            // and the `wish.expired` event.
            return Ok(DonationOutcome::WishClosed {
                status: WishStatus::Expired.as_str().to_string(),
            });
        }

        let query = format!(
            "INSERT INTO donations (wish_id, donor_id, amount, status, is_anonymous, message) \
             VALUES ($1, $2, $3, 'completed', $4, $5) \
             RETURNING {COLUMNS}"
        );
        let donation = sqlx::query_as::<_, Donation>(&query)
            .bind(input.wish_id)
            .bind(input.donor_id)
            .bind(input.amount)
            .bind(input.is_anonymous)
            .bind(&input.message)
            .fetch_one(&mut *tx)
            .await?;

        let karma_awarded = karma_for_donation(input.amount);
        ProfileRepo::add_karma(&mut *tx, input.donor_id, karma_awarded).await?;

        let wish_funded = WishRepo::mark_funded_if_reached(&mut *tx, input.wish_id).await?;

        tx.commit().await?;

        Ok(DonationOutcome::Recorded {
            donation,
            karma_awarded,
            wish_funded,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Completed donations for a wish, newest first.
    pub async fn list_completed_for_wish(
        pool: &PgPool,
        wish_id: DbId,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations \
             WHERE wish_id = $1 AND status = 'completed' \
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(wish_id)
            .fetch_all(pool)
            .await
    }

    /// Amounts of the completed donations for a wish.
    pub async fn completed_amounts_for_wish(
        pool: &PgPool,
        wish_id: DbId,
    ) -> Result<Vec<Cents>, sqlx::Error> {
        sqlx::query_scalar::<_, Cents>(
            "SELECT amount FROM donations WHERE wish_id = $1 AND status = 'completed'",
        )
        .bind(wish_id)
        .fetch_all(pool)
        .await
    }

    /// Completed donations with a known donor. Leaderboard input.
    pub async fn list_completed(pool: &PgPool) -> Result<Vec<ContributionRow>, sqlx::Error> {
        sqlx::query_as::<_, ContributionRow>(
            "SELECT donor_id, amount, status FROM donations \
             WHERE donor_id IS NOT NULL AND status = 'completed'",
        )
        .fetch_all(pool)
        .await
    }

    /// Donations made by `donor_id`, newest first.
    pub async fn list_by_donor(pool: &PgPool, donor_id: DbId) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations \
             WHERE donor_id = $1 \
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(donor_id)
            .fetch_all(pool)
            .await
    }
}
