//! Profile rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wishdrop_core::error::CoreError;
use wishdrop_core::leaderboard::LeaderboardProfile;
use wishdrop_core::roles::Role;
use wishdrop_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub profile_pic: Option<String>,
    pub is_verified: bool,
    pub karma: i64,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_ok_and(Role::is_admin)
    }
}

impl From<&Profile> for LeaderboardProfile {
    fn from(p: &Profile) -> Self {
        LeaderboardProfile {
            id: p.id,
            name: p.name.clone(),
            karma: p.karma,
        }
    }
}

/// DTO for creating the profile of a newly signed-in account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
}

/// DTO for updating a profile. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
    pub role: Option<Role>,
}
