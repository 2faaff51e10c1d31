//! Handlers for the badge catalog and badge grants.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use wishdrop_core::badges::{self, find_badge};
use wishdrop_core::error::CoreError;
use wishdrop_core::types::{Cents, DbId};
use wishdrop_db::models::badge::CreateBadge;
use wishdrop_db::repositories::{BadgeRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBadgeRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    /// Unknown icon names are stored as given and rendered with the
    /// fallback icon.
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub icon: String,
    #[validate(range(min = 1, message = "must be positive"))]
    pub criteria_amount: Option<Cents>,
    #[validate(range(min = 1, message = "must be positive"))]
    pub criteria_count: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GrantBadgeRequest {
    pub user_id: DbId,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// GET /api/v1/badges
pub async fn list_badges(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = BadgeRepo::list_catalog(&state.pool).await?;
    Ok(Json(DataResponse { data: catalog }))
}

/// POST /api/v1/badges
pub async fn create_badge(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBadgeRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let badge = BadgeRepo::create(
        &state.pool,
        &CreateBadge {
            name: input.name.trim().to_string(),
            description: input.description,
            icon: input.icon.trim().to_string(),
            criteria_amount: input.criteria_amount,
            criteria_count: input.criteria_count,
        },
    )
    .await?;

    tracing::info!(badge_id = %badge.id, name = %badge.name, admin_id = %admin.user_id, "Badge created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: badge })))
}

/// POST /api/v1/badges/{id}/grants
///
/// Grant a badge to a user. Granting the same badge twice is a 409. The
/// holder is notified by the badge watcher on its next poll.
pub async fn grant_badge(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(badge_id): Path<DbId>,
    Json(input): Json<GrantBadgeRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let catalog: Vec<badges::Badge> = BadgeRepo::list_catalog(&state.pool)
        .await?
        .into_iter()
        .map(badges::Badge::from)
        .collect();
    find_badge(&catalog, badge_id)?;

    if ProfileRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: input.user_id,
        }));
    }

    let grant = BadgeRepo::grant(&state.pool, input.user_id, badge_id, input.reason.as_deref()).await?;

    tracing::info!(
        badge_id = %badge_id,
        user_id = %input.user_id,
        admin_id = %admin.user_id,
        "Badge granted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: grant })))
}
