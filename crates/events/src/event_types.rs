//! Dot-separated names of the events published on the bus.

/// A donation was recorded as completed.
pub const DONATION_COMPLETED: &str = "donation.completed";

/// A wish reached its goal and moved to `funded`.
pub const WISH_FUNDED: &str = "wish.funded";

/// A pending wish passed its expiry without being funded.
pub const WISH_EXPIRED: &str = "wish.expired";

/// A user was granted a badge.
pub const BADGE_EARNED: &str = "badge.earned";

/// Entity kinds used as `source_entity_type`.
pub const ENTITY_WISH: &str = "wish";
pub const ENTITY_DONATION: &str = "donation";
pub const ENTITY_BADGE: &str = "badge";
