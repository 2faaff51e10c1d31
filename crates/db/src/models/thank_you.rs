//! Thank-you messages sent by wish owners to donors.

use serde::Serialize;
use sqlx::FromRow;
use wishdrop_core::types::{DbId, Timestamp};

/// A row from the `thank_you_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThankYouMessage {
    pub id: DbId,
    pub donation_id: DbId,
    pub message: Option<String>,
    pub media_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateThankYou {
    pub donation_id: DbId,
    pub message: Option<String>,
    pub media_url: Option<String>,
}
