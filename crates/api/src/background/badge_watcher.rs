//! Announces newly earned badges.
//!
//! Grants may be written by admins through the API or by processes outside
//! this service, so the watcher polls `user_badges` for grants earned in
//! the recent window and publishes `badge.earned` for each one it has not
//! announced before.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use wishdrop_core::badges::{self, recent_window_start, BadgeGrant, BadgeNotificationTracker};
use wishdrop_db::repositories::BadgeRepo;
use wishdrop_events::{EventBus, PlatformEvent};

/// Run the badge watcher loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    event_bus: Arc<EventBus>,
    poll_interval: Duration,
    window_secs: i64,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = poll_interval.as_secs(),
        window_secs,
        "Badge watcher started"
    );

    let mut tracker = BadgeNotificationTracker::new();
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Badge watcher stopping");
                break;
            }
            _ = interval.tick() => {
                match poll_once(&pool, &event_bus, &mut tracker, window_secs).await {
                    Ok(0) => tracing::debug!("Badge watcher: no new grants"),
                    Ok(published) => tracing::info!(published, "Badge watcher: announced new badges"),
                    Err(e) => tracing::error!(error = %e, "Badge watcher: poll failed"),
                }
            }
        }
    }
}

/// One poll: fetch recent grants, publish the unseen ones. Returns how
/// many events were published.
async fn poll_once(
    pool: &PgPool,
    event_bus: &EventBus,
    tracker: &mut BadgeNotificationTracker,
    window_secs: i64,
) -> Result<usize, sqlx::Error> {
    let since = recent_window_start(Utc::now(), window_secs);
    let rows = BadgeRepo::list_grants_since(pool, since).await?;
    let grants: Vec<BadgeGrant> = rows.iter().map(BadgeGrant::from).collect();

    let fresh = tracker.observe(&grants, since);
    if fresh.is_empty() {
        return Ok(0);
    }

    let catalog: Vec<badges::Badge> = BadgeRepo::list_catalog(pool)
        .await?
        .into_iter()
        .map(badges::Badge::from)
        .collect();

    Ok(announce(event_bus, &catalog, &fresh))
}

/// Publish `badge.earned` for each grant whose badge is in `catalog`.
fn announce(event_bus: &EventBus, catalog: &[badges::Badge], grants: &[&BadgeGrant]) -> usize {
    let mut published = 0;
    for grant in grants {
        match badges::notification_for(catalog, grant) {
            Ok(notification) => {
                event_bus.publish(PlatformEvent::badge_earned(&notification));
                published += 1;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    user_id = %grant.user_id,
                    badge_id = %grant.badge_id,
                    "Badge watcher: grant for unknown badge"
                );
            }
        }
    }
    published
}
