//! Repository for the `profiles` table.

use sqlx::{PgExecutor, PgPool};
use wishdrop_core::types::DbId;

use crate::models::profile::{CreateProfile, Profile, UpdateProfile};

/// Column list for `profiles` queries.
const COLUMNS: &str = "id, email, name, bio, location, phone, profile_pic, is_verified, \
                       karma, role, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All profiles in signup order (oldest first, id as tiebreaker).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY created_at, id");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    /// Create the profile for an account on first sign-in, or return the
    /// existing one. The email is refreshed from the identity token.
    pub async fn upsert(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email, name) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the profile does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                 name = COALESCE($2, name), \
                 bio = COALESCE($3, bio), \
                 location = COALESCE($4, location), \
                 profile_pic = COALESCE($5, profile_pic), \
                 role = COALESCE($6, role) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(&input.location)
            .bind(&input.profile_pic)
            .bind(input.role.map(|r| r.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Add karma points to a profile. Returns the new score, or `None` if
    /// the profile does not exist.
    pub async fn add_karma<'e, E>(executor: E, id: DbId, points: i64) -> Result<Option<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "UPDATE profiles SET karma = karma + $2 WHERE id = $1 RETURNING karma",
        )
        .bind(id)
        .bind(points)
        .fetch_optional(executor)
        .await
    }
}
