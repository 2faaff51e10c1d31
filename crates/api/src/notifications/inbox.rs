//! Per-user pending badge notifications.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use wishdrop_core::badges::{BadgeNotification, PendingNotifications};
use wishdrop_core::types::DbId;
use wishdrop_events::PlatformEvent;

/// Holds undismissed badge notifications, keyed by user.
///
/// Contents live in memory only; a restart drops anything not yet shown.
#[derive(Debug, Default)]
pub struct NotificationInbox {
    pending: RwLock<HashMap<DbId, PendingNotifications>>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification for its user. Returns `false` if the same
    /// badge is already waiting.
    pub async fn push(&self, notification: BadgeNotification) -> bool {
        let mut pending = self.pending.write().await;
        pending
            .entry(notification.user_id)
            .or_default()
            .push(notification)
    }

    /// Notifications waiting for `user_id`, oldest first.
    pub async fn pending_for(&self, user_id: DbId) -> Vec<BadgeNotification> {
        let pending = self.pending.read().await;
        pending
            .get(&user_id)
            .map(|p| p.items().to_vec())
            .unwrap_or_default()
    }

    /// Dismiss one badge's notification. Returns `false` if none was queued.
    pub async fn dismiss(&self, user_id: DbId, badge_id: DbId) -> bool {
        let mut pending = self.pending.write().await;
        let Some(queue) = pending.get_mut(&user_id) else {
            return false;
        };
        let dismissed = queue.dismiss(badge_id);
        if queue.is_empty() {
            pending.remove(&user_id);
        }
        dismissed
    }

    /// Dismiss everything queued for `user_id`; returns how many were dropped.
    pub async fn clear(&self, user_id: DbId) -> usize {
        let mut pending = self.pending.write().await;
        pending
            .remove(&user_id)
            .map(|queue| queue.items().len())
            .unwrap_or(0)
    }

    /// Consume `badge.earned` events until the bus closes.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Some(notification) = event.badge_notification() else {
                        continue;
                    };
                    let (user_id, badge_id) = (notification.user_id, notification.badge_id);
                    if self.push(notification).await {
                        tracing::debug!(%user_id, %badge_id, "Queued badge notification");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification inbox lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification inbox shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use wishdrop_events::EventBus;

    use super::*;

    fn notification(user_id: DbId, name: &str) -> BadgeNotification {
        BadgeNotification {
            user_id,
            badge_id: DbId::new_v4(),
            name: name.to_string(),
            description: None,
            icon: "star",
            earned_at: Some(Utc::now()),
            reason: None,
        }
    }

    #[tokio::test]
    async fn notifications_are_kept_per_user() {
        let inbox = NotificationInbox::new();
        let (ana, ben) = (DbId::new_v4(), DbId::new_v4());
        assert!(inbox.push(notification(ana, "First Drop")).await);
        assert!(inbox.push(notification(ben, "Dream Maker")).await);

        let for_ana = inbox.pending_for(ana).await;
        assert_eq!(for_ana.len(), 1);
        assert_eq!(for_ana[0].name, "First Drop");
        assert!(inbox.pending_for(DbId::new_v4()).await.is_empty());
    }

    #[tokio::test]
    async fn same_badge_is_queued_once() {
        let inbox = NotificationInbox::new();
        let n = notification(DbId::new_v4(), "First Drop");
        assert!(inbox.push(n.clone()).await);
        assert!(!inbox.push(n.clone()).await);
        assert_eq!(inbox.pending_for(n.user_id).await.len(), 1);
    }

    #[tokio::test]
    async fn dismiss_and_clear() {
        let inbox = NotificationInbox::new();
        let user = DbId::new_v4();
        let first = notification(user, "First Drop");
        let second = notification(user, "Golden Heart");
        inbox.push(first.clone()).await;
        inbox.push(second.clone()).await;

        assert!(inbox.dismiss(user, first.badge_id).await);
        assert!(!inbox.dismiss(user, first.badge_id).await);
        assert_eq!(inbox.pending_for(user).await, vec![second]);

        assert_eq!(inbox.clear(user).await, 1);
        assert_eq!(inbox.clear(user).await, 0);
        assert!(!inbox.dismiss(user, DbId::new_v4()).await);
    }

    #[tokio::test]
    async fn run_collects_badge_events_from_the_bus() {
        let bus = EventBus::default();
        let inbox = Arc::new(NotificationInbox::new());
        let handle = tokio::spawn(Arc::clone(&inbox).run(bus.subscribe()));

        let n = notification(DbId::new_v4(), "Flex King");
        bus.publish(PlatformEvent::new("wish.funded"));
        bus.publish(PlatformEvent::badge_earned(&n));
        drop(bus);
        handle.await.expect("inbox task should exit when the bus closes");

        assert_eq!(inbox.pending_for(n.user_id).await, vec![n]);
    }
}
