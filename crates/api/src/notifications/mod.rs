//! In-app badge notifications.
//!
//! [`NotificationInbox`] subscribes to the event bus and keeps the badge
//! notifications each user has not dismissed yet.

pub mod inbox;

pub use inbox::NotificationInbox;
