use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`. Admin only.
///
/// ```text
/// GET    /                  -> list_reports
/// POST   /{id}/review       -> review_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports))
        .route("/{id}/review", post(reports::review_report))
}
