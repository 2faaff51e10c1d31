//! Handlers for profiles, karma and badge collections.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wishdrop_core::badges::{partition_badges, Badge, BadgeGrant, BadgePartition};
use wishdrop_core::error::CoreError;
use wishdrop_core::karma::{summarize, KarmaSummary};
use wishdrop_core::roles::Role;
use wishdrop_core::types::{DbId, Timestamp};
use wishdrop_db::models::profile::{CreateProfile, Profile, UpdateProfile};
use wishdrop_db::repositories::{BadgeRepo, ProfileRepo, WishRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub profile_pic: Option<String>,
    pub role: Option<String>,
}

/// Profile fields visible to everyone. Contact details stay private.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: DbId,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
    pub is_verified: bool,
    pub role: String,
    pub created_at: Timestamp,
    pub karma: KarmaSummary,
}

impl PublicProfile {
    fn from_profile(p: Profile) -> AppResult<Self> {
        Ok(Self {
            karma: summarize(p.karma)?,
            id: p.id,
            name: p.name,
            bio: p.bio,
            location: p.location,
            profile_pic: p.profile_pic,
            is_verified: p.is_verified,
            role: p.role,
            created_at: p.created_at,
        })
    }
}

/// The caller's own profile with everything stored about it.
#[derive(Debug, Serialize)]
pub struct OwnProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub karma_summary: KarmaSummary,
    pub wish_count: usize,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Return the caller's profile, creating it on first sign-in.
pub(crate) async fn ensure_profile(pool: &sqlx::PgPool, user: &AuthUser) -> AppResult<Profile> {
    if let Some(profile) = ProfileRepo::find_by_id(pool, user.user_id).await? {
        return Ok(profile);
    }

    let email = user.email.clone().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Token carries no email; cannot create a profile".into(),
        ))
    })?;
    let profile = ProfileRepo::upsert(
        pool,
        &CreateProfile {
            id: user.user_id,
            email,
            name: None,
        },
    )
    .await?;

    tracing::info!(user_id = %profile.id, "Profile created on first sign-in");
    Ok(profile)
}

async fn find_profile(pool: &sqlx::PgPool, id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Profile", id }))
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = find_profile(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: PublicProfile::from_profile(profile)?,
    }))
}

/// GET /api/v1/profiles/{id}/badges
///
/// The badge catalog split into what the profile has earned and what it
/// can still earn.
pub async fn get_profile_badges(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_profile(&state.pool, id).await?;

    let catalog: Vec<Badge> = BadgeRepo::list_catalog(&state.pool)
        .await?
        .into_iter()
        .map(Badge::from)
        .collect();
    let grants: Vec<BadgeGrant> = BadgeRepo::list_grants_for_user(&state.pool, id)
        .await?
        .iter()
        .map(BadgeGrant::from)
        .collect();

    let partition: BadgePartition = partition_badges(id, catalog, &grants);
    Ok(Json(DataResponse { data: partition }))
}

/// GET /api/v1/me
///
/// The caller's profile. Created from the token's email on first call.
pub async fn get_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state.pool, &user).await?;
    let wish_count = WishRepo::list_by_owner(&state.pool, user.user_id).await?.len();
    Ok(Json(DataResponse {
        data: OwnProfile {
            karma_summary: summarize(profile.karma)?,
            profile,
            wish_count,
        },
    }))
}

/// PUT /api/v1/me
///
/// Partial update. Users may switch between `wisher` and `donor`; only an
/// existing admin may keep or set `admin`.
pub async fn update_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let current = ensure_profile(&state.pool, &user).await?;
    let role = input.role.as_deref().map(str::parse::<Role>).transpose()?;
    if role.is_some_and(Role::is_admin) && !current.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "The admin role cannot be self-assigned".into(),
        )));
    }

    let update = UpdateProfile {
        name: input.name,
        bio: input.bio,
        location: input.location,
        profile_pic: input.profile_pic,
        role,
    };
    let profile = ProfileRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;

    tracing::info!(user_id = %user.user_id, role = %profile.role, "Profile updated");

    Ok(Json(DataResponse {
        data: OwnProfile {
            karma_summary: summarize(profile.karma)?,
            wish_count: WishRepo::list_by_owner(&state.pool, user.user_id).await?.len(),
            profile,
        },
    }))
}
