//! Route definitions for wishes and their nested resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{donations, reports, wishes};
use crate::state::AppState;

/// Routes mounted at `/wishes`.
///
/// ```text
/// GET    /                  -> list_wishes
/// POST   /                  -> create_wish
/// GET    /{id}              -> get_wish
/// GET    /{id}/donations    -> list_wish_donations
/// POST   /{id}/donations    -> donate
/// POST   /{id}/reports      -> create_report
/// POST   /{id}/reject       -> reject_wish (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wishes::list_wishes).post(wishes::create_wish))
        .route("/{id}", get(wishes::get_wish))
        .route(
            "/{id}/donations",
            get(donations::list_wish_donations).post(donations::donate),
        )
        .route("/{id}/reports", post(reports::create_report))
        .route("/{id}/reject", post(wishes::reject_wish))
}
