//! Repository for the `badges` and `user_badges` tables.

use sqlx::PgPool;
use wishdrop_core::types::{DbId, Timestamp};

use crate::models::badge::{Badge, CreateBadge, UserBadge};

/// Column list for `badges` queries.
const BADGE_COLUMNS: &str = "id, name, description, icon, criteria_amount, criteria_count, \
                             created_at, updated_at";

/// Column list for `user_badges` queries.
const GRANT_COLUMNS: &str = "id, user_id, badge_id, earned_at, reason, created_at, updated_at";

/// Provides access to the badge catalog and badge grants.
pub struct BadgeRepo;

impl BadgeRepo {
    /// The whole catalog in creation order.
    pub async fn list_catalog(pool: &PgPool) -> Result<Vec<Badge>, sqlx::Error> {
        let query = format!("SELECT {BADGE_COLUMNS} FROM badges ORDER BY created_at, name");
        sqlx::query_as::<_, Badge>(&query).fetch_all(pool).await
    }

    /// Add a badge to the catalog. A duplicate name violates
    /// `uq_badges_name`.
    pub async fn create(pool: &PgPool, input: &CreateBadge) -> Result<Badge, sqlx::Error> {
        let query = format!(
            "INSERT INTO badges (name, description, icon, criteria_amount, criteria_count) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {BADGE_COLUMNS}"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.criteria_amount)
            .bind(input.criteria_count)
            .fetch_one(pool)
            .await
    }

    /// Grants held by one user, earliest first.
    pub async fn list_grants_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {GRANT_COLUMNS} FROM user_badges \
             WHERE user_id = $1 \
             ORDER BY earned_at, id"
        );
        sqlx::query_as::<_, UserBadge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Holder id of every grant, one entry per grant. Leaderboard input.
    pub async fn list_all_grants(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT user_id FROM user_badges")
            .fetch_all(pool)
            .await
    }

    /// Grant `badge_id` to `user_id`. A second grant of the same badge
    /// violates `uq_user_badges_user_badge`.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        badge_id: DbId,
        reason: Option<&str>,
    ) -> Result<UserBadge, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_badges (user_id, badge_id, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {GRANT_COLUMNS}"
        );
        sqlx::query_as::<_, UserBadge>(&query)
            .bind(user_id)
            .bind(badge_id)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// Grants earned at or after `since`, newest first.
    pub async fn list_grants_since(pool: &PgPool, since: Timestamp) -> Result<Vec<UserBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {GRANT_COLUMNS} FROM user_badges \
             WHERE earned_at >= $1 \
             ORDER BY earned_at DESC, id"
        );
        sqlx::query_as::<_, UserBadge>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }
}
