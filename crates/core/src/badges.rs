//! Badge catalog partitioning and new-badge notification tracking.
//!
//! Badges are granted by explicit `user_badges` rows; nothing here decides
//! eligibility. `criteria_amount` / `criteria_count` are carried through
//! as descriptive metadata only.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Cents, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How far back each notification poll looks for freshly earned badges.
pub const DEFAULT_RECENT_WINDOW_SECS: i64 = 60;

/// Interval between notification polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Icons the client knows how to draw. Anything else falls back to `award`.
pub const KNOWN_ICONS: &[&str] = &["trophy", "heart", "star", "crown", "award", "zap"];

/// Fallback icon for unknown icon names.
pub const FALLBACK_ICON: &str = "award";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub criteria_amount: Option<Cents>,
    pub criteria_count: Option<i32>,
}

/// A single grant of a badge to a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeGrant {
    pub user_id: DbId,
    pub badge_id: DbId,
    pub earned_at: Option<Timestamp>,
    pub reason: Option<String>,
}

/// A catalog entry the profile holds, with its grant metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: Option<Timestamp>,
    pub reason: Option<String>,
}

/// Catalog split into what a profile holds and what it can still earn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BadgePartition {
    pub earned: Vec<EarnedBadge>,
    pub available: Vec<Badge>,
}

impl BadgePartition {
    pub fn total(&self) -> usize {
        self.earned.len() + self.available.len()
    }
}

/// Normalise an icon name to one the client can render.
pub fn display_icon(icon: &str) -> &'static str {
    let lower = icon.to_ascii_lowercase();
    KNOWN_ICONS
        .iter()
        .copied()
        .find(|known| *known == lower)
        .unwrap_or(FALLBACK_ICON)
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Split `catalog` into earned and available badges for `user_id`.
///
/// Grants for other profiles and grants naming badges outside the catalog
/// are ignored. When a badge was granted more than once, the earliest
/// grant supplies the metadata. Catalog order is preserved in both halves.
pub fn partition_badges(user_id: DbId, catalog: Vec<Badge>, grants: &[BadgeGrant]) -> BadgePartition {
    let mut by_badge: HashMap<DbId, &BadgeGrant> = HashMap::new();
    for grant in grants.iter().filter(|g| g.user_id == user_id) {
        by_badge
            .entry(grant.badge_id)
            .and_modify(|existing| {
                if earlier(grant.earned_at, existing.earned_at) {
                    *existing = grant;
                }
            })
            .or_insert(grant);
    }

    let mut partition = BadgePartition::default();
    for badge in catalog {
        match by_badge.get(&badge.id) {
            Some(grant) => partition.earned.push(EarnedBadge {
                earned_at: grant.earned_at,
                reason: grant.reason.clone(),
                badge,
            }),
            None => partition.available.push(badge),
        }
    }
    partition
}

/// `a` sorts before `b`; missing timestamps sort last.
fn earlier(a: Option<Timestamp>, b: Option<Timestamp>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Find a badge by id in an already-fetched catalog.
pub fn find_badge(catalog: &[Badge], badge_id: DbId) -> Result<&Badge, CoreError> {
    catalog
        .iter()
        .find(|b| b.id == badge_id)
        .ok_or(CoreError::NotFound {
            entity: "Badge",
            id: badge_id,
        })
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Start of the look-back window for a notification poll at `now`.
pub fn recent_window_start(now: Timestamp, window_secs: i64) -> Timestamp {
    now - chrono::Duration::seconds(window_secs)
}

/// A newly earned badge to announce to its holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeNotification {
    pub user_id: DbId,
    pub badge_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon: &'static str,
    pub earned_at: Option<Timestamp>,
    pub reason: Option<String>,
}

/// Build the notification for `grant`, looking its badge up in `catalog`.
pub fn notification_for(catalog: &[Badge], grant: &BadgeGrant) -> Result<BadgeNotification, CoreError> {
    let badge = find_badge(catalog, grant.badge_id)?;
    Ok(BadgeNotification {
        user_id: grant.user_id,
        badge_id: badge.id,
        name: badge.name.clone(),
        description: badge.description.clone(),
        icon: display_icon(&badge.icon),
        earned_at: grant.earned_at,
        reason: grant.reason.clone(),
    })
}

/// Remembers which `(user, badge)` grants were already announced.
///
/// Each poll returns every grant inside the recent window, so consecutive
/// polls overlap; `observe` filters that overlap out. Grants earned before
/// the current window can no longer reappear and are forgotten.
#[derive(Debug, Default)]
pub struct BadgeNotificationTracker {
    seen: HashMap<(DbId, DbId), Option<Timestamp>>,
}

impl BadgeNotificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the grants not observed before, in input order. `window_start`
    /// is the lower bound the poll was made with.
    pub fn observe<'a>(
        &mut self,
        grants: &'a [BadgeGrant],
        window_start: Timestamp,
    ) -> Vec<&'a BadgeGrant> {
        self.seen
            .retain(|_, earned_at| !matches!(earned_at, Some(t) if *t < window_start));
        grants
            .iter()
            .filter(|g| {
                self.seen
                    .insert((g.user_id, g.badge_id), g.earned_at)
                    .is_none()
            })
            .collect()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Notifications waiting for one user to acknowledge, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PendingNotifications {
    items: Vec<BadgeNotification>,
}

impl PendingNotifications {
    /// Queue a notification unless one for the same badge is already queued.
    pub fn push(&mut self, notification: BadgeNotification) -> bool {
        if self.items.iter().any(|n| n.badge_id == notification.badge_id) {
            return false;
        }
        self.items.push(notification);
        true
    }

    /// Remove the notification for `badge_id`. Returns whether one existed.
    pub fn dismiss(&mut self, badge_id: DbId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.badge_id != badge_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[BadgeNotification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn badge(name: &str) -> Badge {
        Badge {
            id: DbId::new_v4(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            icon: "star".to_string(),
            criteria_amount: None,
            criteria_count: None,
        }
    }

    fn grant(user_id: DbId, badge_id: DbId, minute: u32) -> BadgeGrant {
        BadgeGrant {
            user_id,
            badge_id,
            earned_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, minute, 0).unwrap()),
            reason: Some(format!("granted at minute {minute}")),
        }
    }

    fn names<'a>(badges: impl Iterator<Item = &'a Badge>) -> Vec<&'a str> {
        badges.map(|b| b.name.as_str()).collect()
    }

    // -- partition --

    #[test]
    fn empty_catalog_gives_empty_partitions() {
        let user = DbId::new_v4();
        let partition = partition_badges(user, vec![], &[grant(user, DbId::new_v4(), 1)]);
        assert!(partition.earned.is_empty());
        assert!(partition.available.is_empty());
    }

    #[test]
    fn no_grants_means_everything_available() {
        let catalog = vec![badge("a"), badge("b"), badge("c")];
        let partition = partition_badges(DbId::new_v4(), catalog.clone(), &[]);
        assert!(partition.earned.is_empty());
        assert_eq!(partition.available, catalog);
    }

    #[test]
    fn partition_is_stable_and_complete() {
        let user = DbId::new_v4();
        let catalog = vec![badge("a"), badge("b"), badge("c"), badge("d"), badge("e")];
        let grants = vec![
            grant(user, catalog[3].id, 1),
            grant(user, catalog[0].id, 2),
            grant(user, catalog[2].id, 3),
        ];

        let partition = partition_badges(user, catalog.clone(), &grants);

        assert_eq!(partition.total(), catalog.len());
        assert_eq!(names(partition.earned.iter().map(|e| &e.badge)), ["a", "c", "d"]);
        assert_eq!(names(partition.available.iter()), ["b", "e"]);

        let earned: HashSet<DbId> = partition.earned.iter().map(|e| e.badge.id).collect();
        assert!(partition.available.iter().all(|b| !earned.contains(&b.id)));
    }

    #[test]
    fn grants_outside_the_catalog_are_ignored() {
        let user = DbId::new_v4();
        let partition = partition_badges(user, vec![badge("a")], &[grant(user, DbId::nil(), 9)]);
        assert!(partition.earned.is_empty());
        assert_eq!(partition.total(), 1);
    }

    #[test]
    fn earned_entries_carry_grant_metadata() {
        let user = DbId::new_v4();
        let catalog = vec![badge("a")];
        let g = grant(user, catalog[0].id, 7);
        let partition = partition_badges(user, catalog, std::slice::from_ref(&g));
        assert_eq!(partition.earned[0].earned_at, g.earned_at);
        assert_eq!(partition.earned[0].reason, g.reason);
    }

    #[test]
    fn duplicate_grants_use_earliest() {
        let user = DbId::new_v4();
        let catalog = vec![badge("a")];
        let grants = vec![grant(user, catalog[0].id, 30), grant(user, catalog[0].id, 5)];
        let partition = partition_badges(user, catalog, &grants);
        assert_eq!(partition.earned.len(), 1);
        assert_eq!(partition.earned[0].earned_at, grants[1].earned_at);
    }

    #[test]
    fn grants_for_other_profiles_are_ignored() {
        let user = DbId::new_v4();
        let other = DbId::new_v4();
        let catalog = vec![badge("a"), badge("b")];
        let grants = vec![grant(other, catalog[0].id, 1)];
        let partition = partition_badges(user, catalog, &grants);
        assert!(partition.earned.is_empty());
        assert_eq!(partition.available.len(), 2);
    }

    // -- lookup --

    #[test]
    fn find_badge_reports_missing_id() {
        let catalog = vec![badge("a")];
        assert_eq!(find_badge(&catalog, catalog[0].id).unwrap().name, "a");
        let missing = DbId::new_v4();
        assert_matches!(
            find_badge(&catalog, missing),
            Err(CoreError::NotFound { entity: "Badge", .. })
        );
    }

    #[test]
    fn unknown_icons_fall_back_to_award() {
        assert_eq!(display_icon("Trophy"), "trophy");
        assert_eq!(display_icon("rocket"), FALLBACK_ICON);
    }

    // -- notifications --

    #[test]
    fn window_start_is_sixty_seconds_back() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            recent_window_start(now, DEFAULT_RECENT_WINDOW_SECS),
            now - Duration::seconds(60)
        );
    }

    fn window_at(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, minute, 0).unwrap()
    }

    #[test]
    fn tracker_reports_each_grant_once() {
        let user = DbId::new_v4();
        let (b1, b2) = (DbId::new_v4(), DbId::new_v4());
        let mut tracker = BadgeNotificationTracker::new();

        let first_poll = vec![grant(user, b1, 1)];
        assert_eq!(tracker.observe(&first_poll, window_at(0)).len(), 1);

        let second_poll = vec![grant(user, b1, 1), grant(user, b2, 2)];
        let fresh = tracker.observe(&second_poll, window_at(0));
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].badge_id, b2);

        assert!(tracker.observe(&second_poll, window_at(0)).is_empty());
        assert_eq!(tracker.seen_count(), 2);
    }

    #[test]
    fn tracker_collapses_duplicates_within_one_poll() {
        let user = DbId::new_v4();
        let b = DbId::new_v4();
        let mut tracker = BadgeNotificationTracker::new();
        let poll = vec![grant(user, b, 1), grant(user, b, 1)];
        assert_eq!(tracker.observe(&poll, window_at(0)).len(), 1);
    }

    #[test]
    fn tracker_forgets_grants_older_than_the_window() {
        let user = DbId::new_v4();
        let (b1, b2) = (DbId::new_v4(), DbId::new_v4());
        let mut tracker = BadgeNotificationTracker::new();

        tracker.observe(&[grant(user, b1, 1), grant(user, b2, 5)], window_at(0));
        assert_eq!(tracker.seen_count(), 2);

        // b1 has slid out of the window; b2 is still inside it.
        let poll = [grant(user, b2, 5)];
        let fresh = tracker.observe(&poll, window_at(3));
        assert!(fresh.is_empty());
        assert_eq!(tracker.seen_count(), 1);

        assert!(tracker.observe(&[], window_at(10)).is_empty());
        assert_eq!(tracker.seen_count(), 0);
    }

    #[test]
    fn notification_for_unknown_badge_is_not_found() {
        let g = grant(DbId::new_v4(), DbId::new_v4(), 1);
        assert_matches!(notification_for(&[], &g), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn pending_notifications_dismiss_and_clear() {
        let user = DbId::new_v4();
        let catalog = vec![badge("a"), badge("b")];
        let mut pending = PendingNotifications::default();

        for b in &catalog {
            let n = notification_for(&catalog, &grant(user, b.id, 1)).unwrap();
            assert!(pending.push(n));
        }
        let dup = notification_for(&catalog, &grant(user, catalog[0].id, 2)).unwrap();
        assert!(!pending.push(dup));
        assert_eq!(pending.items().len(), 2);

        assert!(pending.dismiss(catalog[0].id));
        assert!(!pending.dismiss(catalog[0].id));
        assert_eq!(pending.items()[0].name, "b");

        pending.clear();
        assert!(pending.is_empty());
    }
}
