//! Repository for the `reports` table.

use sqlx::PgPool;
use wishdrop_core::types::DbId;

use crate::models::report::{CreateReport, Report};

const COLUMNS: &str = "id, reporter_id, wish_id, reason, description, is_reviewed, admin_notes, \
                       created_at, updated_at";

pub struct ReportRepo;

impl ReportRepo {
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (reporter_id, wish_id, reason, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.reporter_id)
            .bind(input.wish_id)
            .bind(&input.reason)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Open reports, oldest first.
    pub async fn list_unreviewed(pool: &PgPool) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE NOT is_reviewed ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Report>(&query).fetch_all(pool).await
    }

    /// Close a report with optional notes. Returns `None` if it does not exist.
    pub async fn mark_reviewed(
        pool: &PgPool,
        id: DbId,
        admin_notes: Option<&str>,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports SET is_reviewed = TRUE, admin_notes = COALESCE($2, admin_notes) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(admin_notes)
            .fetch_optional(pool)
            .await
    }
}
