//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use wishdrop_core::badges::{display_icon, BadgeNotification};
use wishdrop_core::types::{Cents, DbId, Timestamp};

use crate::event_types;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, see [`event_types`].
    pub event_type: String,

    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,

    /// The user the event concerns (donor, wish owner, badge holder).
    pub actor_user_id: Option<DbId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

/// Payload of a `badge.earned` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BadgeEarnedPayload {
    user_id: DbId,
    badge_id: DbId,
    name: String,
    description: Option<String>,
    icon: String,
    earned_at: Option<Timestamp>,
    reason: Option<String>,
}

impl PlatformEvent {
    /// Create an event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }

    /// `donation.completed` for a donation just recorded.
    pub fn donation_completed(
        donation_id: DbId,
        wish_id: DbId,
        donor_id: DbId,
        amount: Cents,
        karma_awarded: i64,
    ) -> Self {
        Self::new(event_types::DONATION_COMPLETED)
            .with_source(event_types::ENTITY_DONATION, donation_id)
            .with_actor(donor_id)
            .with_payload(serde_json::json!({
                "wish_id": wish_id,
                "amount": amount,
                "karma_awarded": karma_awarded,
            }))
    }

    /// `wish.funded`, attributed to the wish owner.
    pub fn wish_funded(wish_id: DbId, owner_id: DbId, goal_amount: Cents) -> Self {
        Self::new(event_types::WISH_FUNDED)
            .with_source(event_types::ENTITY_WISH, wish_id)
            .with_actor(owner_id)
            .with_payload(serde_json::json!({ "goal_amount": goal_amount }))
    }

    /// `wish.expired`, attributed to the wish owner.
    pub fn wish_expired(wish_id: DbId, owner_id: DbId, expires_at: Option<Timestamp>) -> Self {
        Self::new(event_types::WISH_EXPIRED)
            .with_source(event_types::ENTITY_WISH, wish_id)
            .with_actor(owner_id)
            .with_payload(serde_json::json!({ "expires_at": expires_at }))
    }

    /// `badge.earned`, carrying everything needed to show the notification.
    pub fn badge_earned(notification: &BadgeNotification) -> Self {
        Self::new(event_types::BADGE_EARNED)
            .with_source(event_types::ENTITY_BADGE, notification.badge_id)
            .with_actor(notification.user_id)
            .with_payload(serde_json::json!({
                "user_id": notification.user_id,
                "badge_id": notification.badge_id,
                "name": notification.name,
                "description": notification.description,
                "icon": notification.icon,
                "earned_at": notification.earned_at,
                "reason": notification.reason,
            }))
    }

    /// Decode the notification carried by a `badge.earned` event. Returns
    /// `None` for other events or a malformed payload.
    pub fn badge_notification(&self) -> Option<BadgeNotification> {
        if !self.is(event_types::BADGE_EARNED) {
            return None;
        }
        let payload: BadgeEarnedPayload = serde_json::from_value(self.payload.clone()).ok()?;
        Some(BadgeNotification {
            user_id: payload.user_id,
            badge_id: payload.badge_id,
            name: payload.name,
            description: payload.description,
            icon: display_icon(&payload.icon),
            earned_at: payload.earned_at,
            reason: payload.reason,
        })
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use wishdrop_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("wish.funded"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity. Slow receivers
    /// observe `RecvError::Lagged` once the buffer overflows.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is subscribed.
    pub fn publish(&self, event: PlatformEvent) {
        tracing::debug!(event_type = %event.event_type, "Publishing event");
        // A send error only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> BadgeNotification {
        BadgeNotification {
            user_id: DbId::new_v4(),
            badge_id: DbId::new_v4(),
            name: "First Drop".into(),
            description: Some("Made your first donation".into()),
            icon: "heart",
            earned_at: Some(Utc::now()),
            reason: None,
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let wish_id = DbId::new_v4();
        bus.publish(PlatformEvent::wish_funded(wish_id, DbId::new_v4(), 5_000));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert!(e1.is(event_types::WISH_FUNDED));
        assert_eq!(e2.source_entity_id, Some(wish_id));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("orphan.event"));
    }

    #[test]
    fn donation_completed_carries_donor_and_amount() {
        let (donation, wish, donor) = (DbId::new_v4(), DbId::new_v4(), DbId::new_v4());
        let event = PlatformEvent::donation_completed(donation, wish, donor, 2_500, 25);
        assert_eq!(event.event_type, "donation.completed");
        assert_eq!(event.source_entity_type.as_deref(), Some("donation"));
        assert_eq!(event.actor_user_id, Some(donor));
        assert_eq!(event.payload["amount"], 2_500);
        assert_eq!(event.payload["karma_awarded"], 25);
        assert_eq!(event.payload["wish_id"], wish.to_string());
    }

    #[test]
    fn badge_notification_survives_the_bus() {
        let original = notification();
        let event = PlatformEvent::badge_earned(&original);
        assert_eq!(event.actor_user_id, Some(original.user_id));
        assert_eq!(event.badge_notification(), Some(original));
    }

    #[test]
    fn other_events_carry_no_badge_notification() {
        let event = PlatformEvent::wish_expired(DbId::new_v4(), DbId::new_v4(), None);
        assert!(event.badge_notification().is_none());
    }

    #[test]
    fn unknown_icon_falls_back_when_decoded() {
        let mut event = PlatformEvent::badge_earned(&notification());
        event.payload["icon"] = serde_json::json!("rocket");
        let decoded = event.badge_notification().expect("payload is well formed");
        assert_eq!(decoded.icon, "award");
    }
}
