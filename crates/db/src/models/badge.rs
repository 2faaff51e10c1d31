//! Badge catalog and grant rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wishdrop_core::badges;
use wishdrop_core::types::{Cents, DbId, Timestamp};

/// A row from the `badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Badge {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub criteria_amount: Option<Cents>,
    pub criteria_count: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Badge> for badges::Badge {
    fn from(b: Badge) -> Self {
        badges::Badge {
            id: b.id,
            name: b.name,
            description: b.description,
            icon: b.icon,
            criteria_amount: b.criteria_amount,
            criteria_count: b.criteria_count,
        }
    }
}

/// A row from the `user_badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadge {
    pub id: DbId,
    pub user_id: DbId,
    pub badge_id: DbId,
    pub earned_at: Timestamp,
    pub reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&UserBadge> for badges::BadgeGrant {
    fn from(ub: &UserBadge) -> Self {
        badges::BadgeGrant {
            user_id: ub.user_id,
            badge_id: ub.badge_id,
            earned_at: Some(ub.earned_at),
            reason: ub.reason.clone(),
        }
    }
}

/// DTO for adding a badge to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBadge {
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub criteria_amount: Option<Cents>,
    pub criteria_count: Option<i32>,
}
