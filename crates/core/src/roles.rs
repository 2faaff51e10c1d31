//! Profile roles.
//!
//! Roles are an advisory classification chosen by the user on their
//! profile. Only `admin` gates anything (badge grants, moderation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_WISHER: &str = "wisher";
pub const ROLE_DONOR: &str = "donor";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Wisher,
    Donor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wisher => ROLE_WISHER,
            Self::Donor => ROLE_DONOR,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wisher => "Wisher",
            Self::Donor => "Donor",
            Self::Admin => "Admin",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_WISHER => Ok(Self::Wisher),
            ROLE_DONOR => Ok(Self::Donor),
            ROLE_ADMIN => Ok(Self::Admin),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: wisher, donor, admin"
            ))),
        }
    }
}
