//! Repository for the `thank_you_messages` table.

use sqlx::PgPool;
use wishdrop_core::types::DbId;

use crate::models::thank_you::{CreateThankYou, ThankYouMessage};

const COLUMNS: &str = "id, donation_id, message, media_url, created_at, updated_at";

pub struct ThankYouRepo;

impl ThankYouRepo {
    pub async fn create(pool: &PgPool, input: &CreateThankYou) -> Result<ThankYouMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO thank_you_messages (donation_id, message, media_url) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ThankYouMessage>(&query)
            .bind(input.donation_id)
            .bind(&input.message)
            .bind(&input.media_url)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_donation(
        pool: &PgPool,
        donation_id: DbId,
    ) -> Result<Vec<ThankYouMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thank_you_messages \
             WHERE donation_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ThankYouMessage>(&query)
            .bind(donation_id)
            .fetch_all(pool)
            .await
    }
}
