//! Route definitions for the caller's own resources. All endpoints require
//! authentication.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{donations, notifications, profiles};
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /                            -> get_me
/// PUT    /                            -> update_me
/// GET    /donations                   -> list_my_donations
/// GET    /notifications               -> list_notifications
/// DELETE /notifications               -> clear_notifications
/// DELETE /notifications/{badge_id}    -> dismiss_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::get_me).put(profiles::update_me))
        .route("/donations", get(donations::list_my_donations))
        .route(
            "/notifications",
            get(notifications::list_notifications).delete(notifications::clear_notifications),
        )
        .route(
            "/notifications/{badge_id}",
            delete(notifications::dismiss_notification),
        )
}
