//! Periodic expiry of overdue wishes.
//!
//! Moves pending wishes past their deadline and short of their goal to
//! `expired`, and publishes `wish.expired` for each.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use wishdrop_db::repositories::WishRepo;
use wishdrop_events::{EventBus, PlatformEvent};

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    event_bus: Arc<EventBus>,
    sweep_interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = sweep_interval.as_secs(), "Expiry sweep started");

    let mut interval = tokio::time::interval(sweep_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match WishRepo::expire_overdue(&pool, Utc::now()).await {
                    Ok(expired) if expired.is_empty() => {
                        tracing::debug!("Expiry sweep: nothing to expire");
                    }
                    Ok(expired) => {
                        for wish in &expired {
                            event_bus.publish(PlatformEvent::wish_expired(
                                wish.id,
                                wish.user_id,
                                wish.expires_at,
                            ));
                        }
                        tracing::info!(count = expired.len(), "Expiry sweep: expired wishes");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry sweep: update failed");
                    }
                }
            }
        }
    }
}
