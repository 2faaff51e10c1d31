//! Wish rows and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wishdrop_core::error::CoreError;
use wishdrop_core::types::{Cents, DbId, Timestamp};
use wishdrop_core::wish::{WishCategory, WishStatus, WishUrgency};

/// A row from the `wishes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wish {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub amount: Cents,
    pub currency: String,
    pub category: String,
    pub urgency: String,
    pub status: String,
    pub location: Option<String>,
    pub media_url: Option<String>,
    pub is_private: bool,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Wish {
    pub fn status(&self) -> Result<WishStatus, CoreError> {
        self.status.parse()
    }

    /// Private wishes are only visible to their owner.
    pub fn is_visible_to(&self, viewer: Option<DbId>) -> bool {
        !self.is_private || viewer == Some(self.user_id)
    }
}

/// A wish joined with its completed-donation total, as returned by listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WishListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub wish: Wish,
    pub total_donated: Cents,
    pub owner_name: Option<String>,
}

/// DTO for inserting a new wish. Values are validated before reaching the
/// repository.
#[derive(Debug, Clone)]
pub struct CreateWish {
    pub title: String,
    pub description: String,
    pub amount: Cents,
    pub category: WishCategory,
    pub urgency: WishUrgency,
    pub location: Option<String>,
    pub media_url: Option<String>,
    pub is_private: bool,
    pub expires_at: Timestamp,
}

