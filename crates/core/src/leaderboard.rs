//! Leaderboard aggregation and ranking.
//!
//! Rows arrive wholesale from the store; per-profile totals are folded in
//! memory and ranked four ways. Ranking uses a stable sort with no
//! secondary key, so profiles tied on a metric keep their input order.

use std::collections::HashMap;

use serde::Serialize;

use crate::donation::DonationStatus;
use crate::error::CoreError;
use crate::types::{Cents, DbId};

/// Entries per ranking when the caller does not ask for a size.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Largest ranking a caller may request.
pub const MAX_LEADERBOARD_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardProfile {
    pub id: DbId,
    pub name: Option<String>,
    pub karma: i64,
}

/// One donation as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionRecord {
    pub donor_id: DbId,
    pub amount: Cents,
    pub status: DonationStatus,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-profile totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub profile_id: DbId,
    pub name: Option<String>,
    pub karma: i64,
    pub total_donated: Cents,
    pub wish_count: i64,
    pub badge_count: i64,
}

/// Fold donations, wish ownership and badge grants into one entry per
/// profile, in profile input order.
///
/// Only completed donations count. Rows pointing at profiles outside
/// `profiles` are skipped.
pub fn aggregate(
    profiles: &[LeaderboardProfile],
    donations: &[ContributionRecord],
    wish_owner_ids: &[DbId],
    badge_holder_ids: &[DbId],
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = profiles
        .iter()
        .map(|p| LeaderboardEntry {
            profile_id: p.id,
            name: p.name.clone(),
            karma: p.karma,
            total_donated: 0,
            wish_count: 0,
            badge_count: 0,
        })
        .collect();

    let index: HashMap<DbId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.profile_id, i))
        .collect();

    for donation in donations.iter().filter(|d| d.status.counts()) {
        if let Some(&i) = index.get(&donation.donor_id) {
            entries[i].total_donated = entries[i].total_donated.saturating_add(donation.amount);
        }
    }
    for owner in wish_owner_ids {
        if let Some(&i) = index.get(owner) {
            entries[i].wish_count += 1;
        }
    }
    for holder in badge_holder_ids {
        if let Some(&i) = index.get(holder) {
            entries[i].badge_count += 1;
        }
    }

    entries
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    Karma,
    TotalDonated,
    WishCount,
    BadgeCount,
}

impl LeaderboardMetric {
    pub fn value(self, entry: &LeaderboardEntry) -> i64 {
        match self {
            Self::Karma => entry.karma,
            Self::TotalDonated => entry.total_donated,
            Self::WishCount => entry.wish_count,
            Self::BadgeCount => entry.badge_count,
        }
    }
}

/// Decoration shown next to a ranked position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDecoration {
    Crown,
    SilverMedal,
    BronzeMedal,
    Number,
}

impl RankDecoration {
    pub fn for_position(position: usize) -> Self {
        match position {
            1 => Self::Crown,
            2 => Self::SilverMedal,
            3 => Self::BronzeMedal,
            _ => Self::Number,
        }
    }
}

/// Numeric label for a position, e.g. `#4`.
pub fn rank_label(position: usize) -> String {
    format!("#{position}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based.
    pub position: usize,
    pub label: String,
    pub decoration: RankDecoration,
    pub value: i64,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Validate a requested ranking size.
pub fn validate_size(size: usize) -> Result<(), CoreError> {
    if size == 0 || size > MAX_LEADERBOARD_SIZE {
        return Err(CoreError::Validation(format!(
            "Leaderboard size must be between 1 and {MAX_LEADERBOARD_SIZE}, got {size}"
        )));
    }
    Ok(())
}

/// Rank `entries` by `metric`, descending, keeping the first `top_n`.
pub fn rank(entries: &[LeaderboardEntry], metric: LeaderboardMetric, top_n: usize) -> Vec<RankedEntry> {
    let mut sorted: Vec<&LeaderboardEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, entry)| {
            let position = i + 1;
            RankedEntry {
                position,
                label: rank_label(position),
                decoration: RankDecoration::for_position(position),
                value: metric.value(entry),
                entry: entry.clone(),
            }
        })
        .collect()
}

/// The four rankings shown on the leaderboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub by_karma: Vec<RankedEntry>,
    pub by_total_donated: Vec<RankedEntry>,
    pub by_wish_count: Vec<RankedEntry>,
    pub by_badge_count: Vec<RankedEntry>,
}

pub fn build_leaderboard(entries: &[LeaderboardEntry], top_n: usize) -> Result<Leaderboard, CoreError> {
    validate_size(top_n)?;
    Ok(Leaderboard {
        by_karma: rank(entries, LeaderboardMetric::Karma, top_n),
        by_total_donated: rank(entries, LeaderboardMetric::TotalDonated, top_n),
        by_wish_count: rank(entries, LeaderboardMetric::WishCount, top_n),
        by_badge_count: rank(entries, LeaderboardMetric::BadgeCount, top_n),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn profile(name: &str, karma: i64) -> LeaderboardProfile {
        LeaderboardProfile {
            id: DbId::new_v4(),
            name: Some(name.to_string()),
            karma,
        }
    }

    fn completed(donor_id: DbId, amount: Cents) -> ContributionRecord {
        ContributionRecord {
            donor_id,
            amount,
            status: DonationStatus::Completed,
        }
    }

    fn ranked_names(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked
            .iter()
            .map(|r| r.entry.name.as_deref().unwrap_or_default())
            .collect()
    }

    #[test]
    fn karma_ties_keep_input_order() {
        let profiles = vec![profile("A", 5), profile("B", 5), profile("C", 10)];
        let entries = aggregate(&profiles, &[], &[], &[]);
        let ranked = rank(&entries, LeaderboardMetric::Karma, DEFAULT_LEADERBOARD_SIZE);
        assert_eq!(ranked_names(&ranked), ["C", "A", "B"]);
    }

    #[test]
    fn only_completed_donations_are_summed() {
        let profiles = vec![profile("A", 0), profile("B", 0)];
        let donations = vec![
            completed(profiles[0].id, 1_000),
            completed(profiles[0].id, 2_500),
            ContributionRecord {
                donor_id: profiles[1].id,
                amount: 99_999,
                status: DonationStatus::Pending,
            },
            ContributionRecord {
                donor_id: profiles[1].id,
                amount: 50_000,
                status: DonationStatus::Failed,
            },
            completed(profiles[1].id, 10),
        ];
        let entries = aggregate(&profiles, &donations, &[], &[]);
        assert_eq!(entries[0].total_donated, 3_500);
        assert_eq!(entries[1].total_donated, 10);
    }

    #[test]
    fn counts_wishes_and_badges() {
        let profiles = vec![profile("A", 0), profile("B", 0)];
        let (a, b) = (profiles[0].id, profiles[1].id);
        let entries = aggregate(&profiles, &[], &[a, b, b], &[a, a, a]);
        assert_eq!((entries[0].wish_count, entries[0].badge_count), (1, 3));
        assert_eq!((entries[1].wish_count, entries[1].badge_count), (2, 0));
    }

    #[test]
    fn rows_for_unknown_profiles_are_skipped() {
        let profiles = vec![profile("A", 0)];
        let stranger = DbId::new_v4();
        let entries = aggregate(&profiles, &[completed(stranger, 500)], &[stranger], &[stranger]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_donated, 0);
        assert_eq!(entries[0].wish_count, 0);
        assert_eq!(entries[0].badge_count, 0);
    }

    #[test]
    fn empty_inputs_give_empty_rankings() {
        let board = build_leaderboard(&[], DEFAULT_LEADERBOARD_SIZE).unwrap();
        assert!(board.by_karma.is_empty());
        assert!(board.by_badge_count.is_empty());
    }

    #[test]
    fn rankings_are_truncated_to_top_n() {
        let profiles: Vec<_> = (0..15).map(|i| profile(&format!("P{i}"), i)).collect();
        let entries = aggregate(&profiles, &[], &[], &[]);
        let board = build_leaderboard(&entries, 10).unwrap();
        assert_eq!(board.by_karma.len(), 10);
        assert_eq!(board.by_karma[0].entry.name.as_deref(), Some("P14"));
        assert_eq!(board.by_karma[9].value, 5);
    }

    #[test]
    fn each_ranking_uses_its_own_metric() {
        let profiles = vec![profile("A", 100), profile("B", 1)];
        let (a, b) = (profiles[0].id, profiles[1].id);
        let entries = aggregate(&profiles, &[completed(b, 5_000)], &[b], &[b]);
        let board = build_leaderboard(&entries, 10).unwrap();
        assert_eq!(ranked_names(&board.by_karma), ["A", "B"]);
        assert_eq!(ranked_names(&board.by_total_donated), ["B", "A"]);
        assert_eq!(ranked_names(&board.by_wish_count), ["B", "A"]);
        assert_eq!(ranked_names(&board.by_badge_count), ["B", "A"]);
        assert_eq!(board.by_total_donated[0].value, 5_000);
        assert_eq!(board.by_karma[0].entry.profile_id, a);
    }

    #[test]
    fn positions_carry_decorations_and_labels() {
        let profiles: Vec<_> = (0..5).map(|i| profile(&format!("P{i}"), 10 - i)).collect();
        let entries = aggregate(&profiles, &[], &[], &[]);
        let ranked = rank(&entries, LeaderboardMetric::Karma, 5);
        let decorations: Vec<_> = ranked.iter().map(|r| r.decoration).collect();
        assert_eq!(
            decorations,
            [
                RankDecoration::Crown,
                RankDecoration::SilverMedal,
                RankDecoration::BronzeMedal,
                RankDecoration::Number,
                RankDecoration::Number,
            ]
        );
        assert_eq!(ranked[3].label, "#4");
        assert_eq!(ranked[0].position, 1);
    }

    #[test]
    fn size_must_be_in_range() {
        assert_matches!(build_leaderboard(&[], 0), Err(CoreError::Validation(_)));
        assert_matches!(
            build_leaderboard(&[], MAX_LEADERBOARD_SIZE + 1),
            Err(CoreError::Validation(_))
        );
        assert!(validate_size(MAX_LEADERBOARD_SIZE).is_ok());
    }
}
