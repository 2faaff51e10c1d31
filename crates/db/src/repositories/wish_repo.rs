//! Repository for the `wishes` table.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use wishdrop_core::types::{DbId, Timestamp};
use wishdrop_core::wish::{WishFilter, WishSort};

use crate::models::wish::{CreateWish, Wish, WishListing};
use crate::repositories::contains_pattern;

/// Column list for `wishes` queries.
const COLUMNS: &str = "id, user_id, title, description, amount, currency, category, urgency, \
                       status, location, media_url, is_private, expires_at, created_at, updated_at";

/// Same columns qualified by the `w` alias, plus the listing extras.
const LISTING_COLUMNS: &str = "w.id, w.user_id, w.title, w.description, w.amount, w.currency, \
                               w.category, w.urgency, w.status, w.location, w.media_url, \
                               w.is_private, w.expires_at, w.created_at, w.updated_at, \
                               COALESCE(d.total, 0)::BIGINT AS total_donated, \
                               p.name AS owner_name";

/// Wishes joined with their owner and completed-donation totals.
const LISTING_FROM: &str = "FROM wishes w \
                            JOIN profiles p ON p.id = w.user_id \
                            LEFT JOIN ( \
                                SELECT wish_id, SUM(amount) AS total \
                                FROM donations WHERE status = 'completed' \
                                GROUP BY wish_id \
                            ) d ON d.wish_id = w.id";

/// Provides CRUD operations for wishes.
pub struct WishRepo;

impl WishRepo {
    /// Insert a new pending wish owned by `user_id`.
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateWish) -> Result<Wish, sqlx::Error> {
        let query = format!(
            "INSERT INTO wishes \
                 (user_id, title, description, amount, category, urgency, location, \
                  media_url, is_private, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wish>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.category.as_str())
            .bind(input.urgency.as_str())
            .bind(&input.location)
            .bind(&input.media_url)
            .bind(input.is_private)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Wish>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wishes WHERE id = $1");
        sqlx::query_as::<_, Wish>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A single wish with its donation total and owner name.
    pub async fn find_listing(pool: &PgPool, id: DbId) -> Result<Option<WishListing>, sqlx::Error> {
        let query = format!("SELECT {LISTING_COLUMNS} {LISTING_FROM} WHERE w.id = $1");
        sqlx::query_as::<_, WishListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Browse wishes matching `filter`.
    ///
    /// Rejected wishes are never listed. Private wishes only appear for
    /// their owner.
    pub async fn list(
        pool: &PgPool,
        filter: &WishFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WishListing>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM} WHERE w.status <> 'rejected'"
        ));

        qb.push(" AND (w.is_private = FALSE");
        if let Some(viewer) = filter.viewer {
            qb.push(" OR w.user_id = ").push_bind(viewer);
        }
        qb.push(")");

        if let Some(category) = filter.category {
            qb.push(" AND w.category = ").push_bind(category.as_str());
        }
        if let Some(urgency) = filter.urgency {
            qb.push(" AND w.urgency = ").push_bind(urgency.as_str());
        }
        if let Some(search) = &filter.search {
            let pattern = contains_pattern(search);
            qb.push(" AND (w.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR w.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR w.location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(min) = filter.min_amount {
            qb.push(" AND w.amount >= ").push_bind(min);
        }
        if let Some(max) = filter.max_amount {
            qb.push(" AND w.amount <= ").push_bind(max);
        }
        if let Some(location) = &filter.location {
            qb.push(" AND w.location ILIKE ")
                .push_bind(contains_pattern(location));
        }

        qb.push(" ORDER BY ").push(order_clause(filter.sort));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        qb.build_query_as::<WishListing>().fetch_all(pool).await
    }

    /// All wishes owned by `user_id`, newest first, private ones included.
    pub async fn list_by_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<WishListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM} \
             WHERE w.user_id = $1 \
             ORDER BY w.created_at DESC, w.id"
        );
        sqlx::query_as::<_, WishListing>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Owner id of every wish, one entry per wish. Leaderboard input.
    pub async fn list_owner_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT user_id FROM wishes")
            .fetch_all(pool)
            .await
    }

    /// Flip a pending wish to funded once its completed donations reach
    /// the goal. Returns `true` only for the call that made the transition.
    pub async fn mark_funded_if_reached<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE wishes SET status = 'funded' \
             WHERE id = $1 AND status = 'pending' \
               AND amount <= ( \
                   SELECT COALESCE(SUM(amount), 0) FROM donations \
                   WHERE wish_id = $1 AND status = 'completed' \
               )",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Expire every pending, underfunded wish whose expiry is before `now`.
    /// Returns the wishes that changed.
    pub async fn expire_overdue(pool: &PgPool, now: Timestamp) -> Result<Vec<Wish>, sqlx::Error> {
        let query = format!(
            "UPDATE wishes w SET status = 'expired' \
             WHERE w.status = 'pending' \
               AND w.expires_at IS NOT NULL AND w.expires_at < $1 \
               AND w.amount > ( \
                   SELECT COALESCE(SUM(d.amount), 0) FROM donations d \
                   WHERE d.wish_id = w.id AND d.status = 'completed' \
               ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wish>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Reject a pending wish. Returns `None` if the wish does not exist or
    /// is no longer pending.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<Option<Wish>, sqlx::Error> {
        let query = format!(
            "UPDATE wishes SET status = 'rejected' \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wish>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

fn order_clause(sort: WishSort) -> &'static str {
    match sort {
        WishSort::CreatedAt => "w.created_at DESC, w.id",
        WishSort::ExpiresAt => "w.expires_at ASC NULLS LAST, w.created_at DESC, w.id",
        WishSort::Amount => "w.amount ASC, w.created_at DESC, w.id",
        WishSort::AmountDesc => "w.amount DESC, w.created_at DESC, w.id",
        WishSort::Urgency => {
            "CASE w.urgency WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END, \
             w.created_at DESC, w.id"
        }
    }
}
