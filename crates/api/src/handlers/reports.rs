//! Handlers for reporting wishes and reviewing reports.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use wishdrop_core::error::CoreError;
use wishdrop_core::types::DbId;
use wishdrop_db::models::report::CreateReport;
use wishdrop_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::profiles::ensure_profile;
use crate::handlers::wishes::ensure_visible_wish;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub reason: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReviewReportRequest {
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub admin_notes: Option<String>,
}

/// POST /api/v1/wishes/{id}/reports
pub async fn create_report(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
    Json(input): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_visible_wish(&state.pool, wish_id, Some(user.user_id)).await?;
    ensure_profile(&state.pool, &user).await?;

    let report = ReportRepo::create(
        &state.pool,
        &CreateReport {
            reporter_id: user.user_id,
            wish_id,
            reason: input.reason.trim().to_string(),
            description: input.description,
        },
    )
    .await?;

    tracing::info!(report_id = %report.id, wish_id = %wish_id, reporter_id = %user.user_id, "Wish reported");

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports
pub async fn list_reports(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reports = ReportRepo::list_unreviewed(&state.pool).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// POST /api/v1/reports/{id}/review
pub async fn review_report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewReportRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let report = ReportRepo::mark_reviewed(&state.pool, id, input.admin_notes.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Report", id }))?;

    tracing::info!(report_id = %id, admin_id = %admin.user_id, "Report reviewed");

    Ok(Json(DataResponse { data: report }))
}
