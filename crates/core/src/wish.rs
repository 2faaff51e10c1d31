//! Wish enumerations, lifecycle rules and listing criteria.
//!
//! Statuses, categories and urgencies are stored as TEXT columns; the
//! enums here own the canonical spellings and the transitions between
//! statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Cents, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lifetime given to a wish created without an explicit expiry.
pub const DEFAULT_WISH_LIFETIME_DAYS: i64 = 30;

/// Longest lifetime a wish may be created with.
pub const MAX_WISH_LIFETIME_DAYS: i64 = 365;

/// Filter values the browse page sends to mean "no filter".
const ANY_FILTER_VALUES: &[&str] = &["", "all", "all_categories", "all_urgency"];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishCategory {
    Education,
    Medical,
    PetCare,
    Community,
    Technology,
    Family,
    Emergency,
    Other,
}

impl WishCategory {
    pub const ALL: [WishCategory; 8] = [
        Self::Education,
        Self::Medical,
        Self::PetCare,
        Self::Community,
        Self::Technology,
        Self::Family,
        Self::Emergency,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Medical => "medical",
            Self::PetCare => "pet_care",
            Self::Community => "community",
            Self::Technology => "technology",
            Self::Family => "family",
            Self::Emergency => "emergency",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Medical => "Medical",
            Self::PetCare => "Pet Care",
            Self::Community => "Community",
            Self::Technology => "Technology",
            Self::Family => "Family",
            Self::Emergency => "Emergency",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for WishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown wish category '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishUrgency {
    Low,
    #[default]
    Medium,
    High,
}

impl WishUrgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Priority",
            Self::Medium => "Moderate",
            Self::High => "Urgent",
        }
    }
}

impl fmt::Display for WishUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishUrgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::Validation(format!(
                "Unknown wish urgency '{other}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishStatus {
    #[default]
    Pending,
    Funded,
    Expired,
    Rejected,
}

impl WishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Funded => "funded",
            Self::Expired => "expired",
            Self::Rejected => "rejected",
        }
    }

    /// Only pending wishes accept donations or change status.
    pub fn is_open(self) -> bool {
        self == Self::Pending
    }
}

impl fmt::Display for WishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "funded" => Ok(Self::Funded),
            "expired" => Ok(Self::Expired),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown wish status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Validate a wish goal amount. Goals are strictly positive cents.
pub fn validate_goal_amount(goal: Cents) -> Result<(), CoreError> {
    if goal <= 0 {
        return Err(CoreError::Validation(format!(
            "Wish goal amount must be positive, got {goal}"
        )));
    }
    Ok(())
}

/// Resolve the expiry for a new wish.
///
/// `None` gives the default lifetime. An explicit expiry must lie in the
/// future and no further out than [`MAX_WISH_LIFETIME_DAYS`].
pub fn resolve_expiry(requested: Option<Timestamp>, now: Timestamp) -> Result<Timestamp, CoreError> {
    let Some(expires_at) = requested else {
        return Ok(now + chrono::Duration::days(DEFAULT_WISH_LIFETIME_DAYS));
    };
    if expires_at <= now {
        return Err(CoreError::Validation(
            "Wish expiry must be in the future".into(),
        ));
    }
    if expires_at > now + chrono::Duration::days(MAX_WISH_LIFETIME_DAYS) {
        return Err(CoreError::Validation(format!(
            "Wish expiry must be within {MAX_WISH_LIFETIME_DAYS} days"
        )));
    }
    Ok(expires_at)
}

/// Derive the status a wish should be in given its funding and the clock.
///
/// Only `pending` wishes move. Reaching the goal takes precedence over
/// expiry, so a wish funded after its deadline still reads as funded.
pub fn next_status(
    current: WishStatus,
    total_completed: Cents,
    goal: Cents,
    expires_at: Option<Timestamp>,
    now: Timestamp,
) -> WishStatus {
    if !current.is_open() {
        return current;
    }
    if total_completed >= goal {
        return WishStatus::Funded;
    }
    match expires_at {
        Some(deadline) if now > deadline => WishStatus::Expired,
        _ => WishStatus::Pending,
    }
}

// ---------------------------------------------------------------------------
// Listing criteria
// ---------------------------------------------------------------------------

/// Sort orders offered by the browse page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishSort {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Soonest deadline first.
    ExpiresAt,
    /// Smallest goal first.
    Amount,
    /// Largest goal first.
    AmountDesc,
    /// Most urgent first.
    Urgency,
}

impl FromStr for WishSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "created_at" => Ok(Self::CreatedAt),
            "expires_at" => Ok(Self::ExpiresAt),
            "amount" => Ok(Self::Amount),
            "amount_desc" => Ok(Self::AmountDesc),
            "urgency" => Ok(Self::Urgency),
            other => Err(CoreError::Validation(format!(
                "Unknown sort '{other}'. Must be one of: created_at, expires_at, amount, amount_desc, urgency"
            ))),
        }
    }
}

/// Validated criteria for listing wishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WishFilter {
    pub category: Option<WishCategory>,
    pub urgency: Option<WishUrgency>,
    /// Case-insensitive match against title, description or location.
    pub search: Option<String>,
    pub min_amount: Option<Cents>,
    pub max_amount: Option<Cents>,
    pub location: Option<String>,
    pub sort: WishSort,
    /// Profile whose own private wishes are included.
    pub viewer: Option<DbId>,
}

/// Raw, unvalidated listing parameters as received from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishFilterParams {
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub search: Option<String>,
    pub min_amount: Option<Cents>,
    pub max_amount: Option<Cents>,
    pub location: Option<String>,
    pub sort: Option<String>,
}

impl WishFilter {
    pub fn from_params(params: &WishFilterParams, viewer: Option<DbId>) -> Result<Self, CoreError> {
        let category = non_any(params.category.as_deref())
            .map(str::parse::<WishCategory>)
            .transpose()?;
        let urgency = non_any(params.urgency.as_deref())
            .map(str::parse::<WishUrgency>)
            .transpose()?;
        let sort = params.sort.as_deref().unwrap_or_default().parse()?;

        for (name, value) in [("min_amount", params.min_amount), ("max_amount", params.max_amount)] {
            if value.is_some_and(|v| v < 0) {
                return Err(CoreError::Validation(format!("{name} must not be negative")));
            }
        }
        if let (Some(min), Some(max)) = (params.min_amount, params.max_amount) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min_amount ({min}) must not exceed max_amount ({max})"
                )));
            }
        }

        Ok(Self {
            category,
            urgency,
            search: trimmed(params.search.as_deref()),
            min_amount: params.min_amount,
            max_amount: params.max_amount,
            location: trimmed(params.location.as_deref()),
            sort,
            viewer,
        })
    }
}

fn non_any(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !ANY_FILTER_VALUES.contains(v))
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
