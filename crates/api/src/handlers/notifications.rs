//! Handlers for the caller's pending badge notifications.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use wishdrop_core::error::CoreError;
use wishdrop_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/notifications
pub async fn list_notifications(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let pending = state.inbox.pending_for(user.user_id).await;
    Ok(Json(DataResponse { data: pending }))
}

/// DELETE /api/v1/me/notifications
pub async fn clear_notifications(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let cleared = state.inbox.clear(user.user_id).await;
    tracing::debug!(user_id = %user.user_id, cleared, "Notifications cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/me/notifications/{badge_id}
pub async fn dismiss_notification(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(badge_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.inbox.dismiss(user.user_id, badge_id).await {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: badge_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
