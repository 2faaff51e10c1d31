//! Wish reports raised by users for moderation.

use serde::Serialize;
use sqlx::FromRow;
use wishdrop_core::types::{DbId, Timestamp};

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub reporter_id: DbId,
    pub wish_id: Option<DbId>,
    pub reason: String,
    pub description: Option<String>,
    pub is_reviewed: bool,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateReport {
    pub reporter_id: DbId,
    pub wish_id: DbId,
    pub reason: String,
    pub description: Option<String>,
}
