pub mod badges;
pub mod donations;
pub mod health;
pub mod leaderboard;
pub mod me;
pub mod profiles;
pub mod reports;
pub mod wishes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /wishes                              list, create
/// /wishes/{id}                         get
/// /wishes/{id}/donations               list, donate
/// /wishes/{id}/reports                 report (POST)
/// /wishes/{id}/reject                  reject (POST, admin)
///
/// /donations/{id}/thank-you            list, create
///
/// /profiles/{id}                       public profile + karma
/// /profiles/{id}/badges                earned / available badges
///
/// /me                                  get, update own profile
/// /me/donations                        own donations
/// /me/notifications                    list, clear
/// /me/notifications/{badge_id}         dismiss (DELETE)
///
/// /badges                              list, create (admin)
/// /badges/{id}/grants                  grant (POST, admin)
///
/// /leaderboard                         rankings (?limit)
///
/// /reports                             unreviewed reports (admin)
/// /reports/{id}/review                 mark reviewed (POST, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/wishes", wishes::router())
        .nest("/donations", donations::router())
        .nest("/profiles", profiles::router())
        .nest("/me", me::router())
        .nest("/badges", badges::router())
        .nest("/leaderboard", leaderboard::router())
        .nest("/reports", reports::router())
}
