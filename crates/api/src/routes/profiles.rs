use axum::routing::get;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /{id}              -> get_profile
/// GET    /{id}/badges       -> get_profile_badges
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(profiles::get_profile))
        .route("/{id}/badges", get(profiles::get_profile_badges))
}
