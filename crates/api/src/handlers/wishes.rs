//! Handlers for browsing, creating and moderating wishes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wishdrop_core::error::CoreError;
use wishdrop_core::funding::{compute_progress, FundingProgress};
use wishdrop_core::types::{Cents, DbId, Timestamp};
use wishdrop_core::wish::{
    next_status, resolve_expiry, WishCategory, WishFilter, WishFilterParams, WishUrgency,
};
use wishdrop_db::models::wish::{CreateWish, Wish, WishListing};
use wishdrop_db::repositories::{clamp_limit, clamp_offset, WishRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::profiles::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWishRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub description: String,
    /// Goal in cents.
    #[validate(range(min = 1, message = "must be positive"))]
    pub amount: Cents,
    pub category: String,
    pub urgency: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub media_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    /// Defaults to the standard wish lifetime.
    pub expires_at: Option<Timestamp>,
}

/// A wish as returned to clients: the row, its donation total and the
/// derived funding progress.
///
/// `status` reflects [`next_status`] at read time, so a wish past its
/// deadline reads as expired before the sweep has persisted it.
#[derive(Debug, Serialize)]
pub struct WishView {
    #[serde(flatten)]
    pub listing: WishListing,
    pub progress: FundingProgress,
}

impl WishView {
    pub fn from_listing(mut listing: WishListing, now: Timestamp) -> AppResult<Self> {
        let wish = &listing.wish;
        let progress = progress_of(wish.amount, listing.total_donated)?;
        let stored = wish.status()?;
        let effective = next_status(stored, listing.total_donated, wish.amount, wish.expires_at, now);
        if effective != stored {
            listing.wish.status = effective.as_str().to_string();
        }
        Ok(Self { listing, progress })
    }
}

/// Funding progress from a goal and an already-summed total.
pub(crate) fn progress_of(goal: Cents, total: Cents) -> Result<FundingProgress, CoreError> {
    compute_progress(goal, std::iter::once(total).filter(|t| *t > 0))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a wish the viewer may see. Private wishes of other users are
/// reported as missing.
pub(crate) async fn ensure_visible_wish(
    pool: &sqlx::PgPool,
    id: DbId,
    viewer: Option<DbId>,
) -> AppResult<Wish> {
    WishRepo::find_by_id(pool, id)
        .await?
        .filter(|w| w.is_visible_to(viewer))
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Wish", id }))
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/wishes
///
/// Browse wishes. Accepts `category`, `urgency`, `search`, `min_amount`,
/// `max_amount`, `location`, `sort`, `limit` and `offset`.
pub async fn list_wishes(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Query(params): Query<WishFilterParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = WishFilter::from_params(&params, viewer.map(|u| u.user_id))?;
    let listings = WishRepo::list(
        &state.pool,
        &filter,
        clamp_limit(page.limit),
        clamp_offset(page.offset),
    )
    .await?;

    let now = Utc::now();
    let wishes = listings
        .into_iter()
        .map(|l| WishView::from_listing(l, now))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(DataResponse { data: wishes }))
}

/// POST /api/v1/wishes
pub async fn create_wish(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateWishRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let category: WishCategory = input.category.parse()?;
    let urgency: WishUrgency = match input.urgency.as_deref() {
        Some(u) => u.parse()?,
        None => WishUrgency::default(),
    };
    let expires_at = resolve_expiry(input.expires_at, Utc::now())?;

    ensure_profile(&state.pool, &user).await?;

    let create = CreateWish {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        amount: input.amount,
        category,
        urgency,
        location: input.location,
        media_url: input.media_url,
        is_private: input.is_private,
        expires_at,
    };
    let wish = WishRepo::create(&state.pool, user.user_id, &create).await?;

    tracing::info!(
        wish_id = %wish.id,
        user_id = %user.user_id,
        amount = wish.amount,
        category = %wish.category,
        "Wish created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: wish })))
}

/// GET /api/v1/wishes/{id}
pub async fn get_wish(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let viewer_id = viewer.map(|u| u.user_id);
    let listing = WishRepo::find_listing(&state.pool, id)
        .await?
        .filter(|l| l.wish.is_visible_to(viewer_id))
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Wish", id }))?;

    let view = WishView::from_listing(listing, Utc::now())?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/wishes/{id}/reject
///
/// Admin moderation: move a pending wish to `rejected`.
pub async fn reject_wish(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let Some(wish) = WishRepo::reject(&state.pool, id).await? else {
        let existing = WishRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Wish", id }))?;
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only pending wishes can be rejected; this wish is {}",
            existing.status
        ))));
    };

    tracing::info!(wish_id = %id, admin_id = %admin.user_id, "Wish rejected");
    Ok(Json(DataResponse { data: wish }))
}
