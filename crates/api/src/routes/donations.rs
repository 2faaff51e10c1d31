use axum::routing::get;
use axum::Router;

use crate::handlers::donations;
use crate::state::AppState;

/// Routes mounted at `/donations`.
///
/// ```text
/// GET    /{id}/thank-you    -> list_thank_yous
/// POST   /{id}/thank-you    -> create_thank_you
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/thank-you",
        get(donations::list_thank_yous).post(donations::create_thank_you),
    )
}
