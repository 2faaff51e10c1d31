use axum::routing::{get, post};
use axum::Router;

use crate::handlers::badges;
use crate::state::AppState;

/// Routes mounted at `/badges`.
///
/// ```text
/// GET    /                  -> list_badges
/// POST   /                  -> create_badge (admin)
/// POST   /{id}/grants       -> grant_badge (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(badges::list_badges).post(badges::create_badge))
        .route("/{id}/grants", post(badges::grant_badge))
}
