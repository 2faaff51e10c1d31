//! Handler for the community leaderboard.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use wishdrop_core::leaderboard::{
    aggregate, build_leaderboard, validate_size, ContributionRecord, LeaderboardProfile,
};
use wishdrop_db::repositories::{BadgeRepo, DonationRepo, ProfileRepo, WishRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// Entries per ranking; defaults to the configured size.
    pub limit: Option<usize>,
}

/// GET /api/v1/leaderboard
///
/// Four rankings (karma, total donated, wishes posted, badges earned),
/// each truncated to `limit` entries.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<impl IntoResponse> {
    let size = params.limit.unwrap_or(state.config.leaderboard_size);
    validate_size(size)?;

    let profiles: Vec<LeaderboardProfile> = ProfileRepo::list_all(&state.pool)
        .await?
        .iter()
        .map(LeaderboardProfile::from)
        .collect();
    let donations: Vec<ContributionRecord> = DonationRepo::list_completed(&state.pool)
        .await?
        .iter()
        .filter_map(|row| row.to_record())
        .collect();
    let wish_owners = WishRepo::list_owner_ids(&state.pool).await?;
    let badge_holders = BadgeRepo::list_all_grants(&state.pool).await?;

    let entries = aggregate(&profiles, &donations, &wish_owners, &badge_holders);
    let board = build_leaderboard(&entries, size)?;

    Ok(Json(DataResponse { data: board }))
}
